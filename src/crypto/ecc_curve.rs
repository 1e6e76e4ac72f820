use bytes::Bytes;
use const_oid::ObjectIdentifier;

const CURVE25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.3029.1.5.1");
const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.11591.15.1");
const P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const P521: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const BRAINPOOL_P256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.7");
const BRAINPOOL_P384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.11");
const BRAINPOOL_P512R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.13");

/// Named curves that may appear in OpenPGP ECC keys, RFC 6637.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ECCCurve {
    Curve25519,
    Ed25519,
    P256,
    P384,
    P521,
    BrainpoolP256r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    /// Raw OID bytes of a curve we do not know.
    Unknown(Bytes),
}

impl ECCCurve {
    /// Looks up a curve by the DER encoded OID body stored in key material.
    pub fn from_oid(oid: &[u8]) -> Self {
        let known = [
            ECCCurve::Curve25519,
            ECCCurve::Ed25519,
            ECCCurve::P256,
            ECCCurve::P384,
            ECCCurve::P521,
            ECCCurve::BrainpoolP256r1,
            ECCCurve::BrainpoolP384r1,
            ECCCurve::BrainpoolP512r1,
        ];
        known
            .into_iter()
            .find(|c| c.oid() == oid)
            .unwrap_or_else(|| ECCCurve::Unknown(Bytes::copy_from_slice(oid)))
    }

    /// Standard name
    pub fn name(&self) -> &str {
        match self {
            ECCCurve::Curve25519 => "Curve25519",
            ECCCurve::Ed25519 => "Ed25519",
            ECCCurve::P256 => "NIST P-256",
            ECCCurve::P384 => "NIST P-384",
            ECCCurve::P521 => "NIST P-521",
            ECCCurve::BrainpoolP256r1 => "brainpoolP256r1",
            ECCCurve::BrainpoolP384r1 => "brainpoolP384r1",
            ECCCurve::BrainpoolP512r1 => "brainpoolP512r1",
            ECCCurve::Unknown(_) => "unknown",
        }
    }

    /// DER encoded OID body, without tag and length, as written in key packets.
    pub fn oid(&self) -> &[u8] {
        match self {
            ECCCurve::Unknown(raw) => raw,
            _ => self.known_oid().map(|oid| oid.as_bytes()).unwrap_or_default(),
        }
    }

    fn known_oid(&self) -> Option<&'static ObjectIdentifier> {
        let oid = match self {
            ECCCurve::Curve25519 => &CURVE25519,
            ECCCurve::Ed25519 => &ED25519,
            ECCCurve::P256 => &P256,
            ECCCurve::P384 => &P384,
            ECCCurve::P521 => &P521,
            ECCCurve::BrainpoolP256r1 => &BRAINPOOL_P256R1,
            ECCCurve::BrainpoolP384r1 => &BRAINPOOL_P384R1,
            ECCCurve::BrainpoolP512r1 => &BRAINPOOL_P512R1,
            ECCCurve::Unknown(_) => return None,
        };
        Some(oid)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_oid_bytes() {
        assert_eq!(
            ECCCurve::Curve25519.oid(),
            &hex!("2B060104019755010501")[..]
        );
        assert_eq!(ECCCurve::P256.oid(), &hex!("2A8648CE3D030107")[..]);
        assert_eq!(ECCCurve::P384.oid(), &hex!("2B81040022")[..]);
    }

    #[test]
    fn test_from_oid() {
        assert_eq!(
            ECCCurve::from_oid(&hex!("2B060104019755010501")),
            ECCCurve::Curve25519
        );
        assert_eq!(ECCCurve::from_oid(&hex!("2B81040022")), ECCCurve::P384);

        let unknown = ECCCurve::from_oid(&hex!("2B8104000A"));
        assert_eq!(unknown.name(), "unknown");
        assert_eq!(unknown.oid(), &hex!("2B8104000A")[..]);
    }
}
