use std::io;

use byteorder::WriteBytesExt;
use bytes::{Buf, Bytes};
use elliptic_curve::sec1::ToEncodedPoint;
use num_bigint::BigUint;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use crate::crypto::ecc_curve::ECCCurve;
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// Largest RSA modulus accepted, in bits.
pub const MAX_RSA_BITS: usize = 16384;

/// Algorithm specific public key material.
#[derive(derive_more::Debug, PartialEq, Eq, Clone)]
pub enum PublicParams {
    RSA(RsaPublicParams),
    ECDH(EcdhPublicParams),
    /// Material of algorithms we never encrypt to, kept verbatim.
    Other(#[debug("{}", hex::encode(_0))] Bytes),
}

impl PublicParams {
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<Self> {
        match alg {
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign => {
                Ok(PublicParams::RSA(RsaPublicParams::try_from_buf(i)?))
            }
            PublicKeyAlgorithm::ECDH => Ok(PublicParams::ECDH(EcdhPublicParams::try_from_buf(i)?)),
            _ => Ok(PublicParams::Other(i.rest())),
        }
    }
}

impl Serialize for PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PublicParams::RSA(params) => params.to_writer(writer),
            PublicParams::ECDH(params) => params.to_writer(writer),
            PublicParams::Other(raw) => {
                writer.write_all(raw)?;
                Ok(())
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            PublicParams::RSA(params) => params.write_len(),
            PublicParams::ECDH(params) => params.write_len(),
            PublicParams::Other(raw) => raw.len(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RsaPublicParams {
    pub key: RsaPublicKey,
}

impl RsaPublicParams {
    pub fn try_from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let n = Mpi::from_buf(i)?;
        let e = Mpi::from_buf(i)?;
        Self::try_from_mpi(&n, &e)
    }

    pub fn try_from_mpi(n: &Mpi, e: &Mpi) -> Result<Self> {
        let key = RsaPublicKey::new_with_max_size(BigUint::from(n), BigUint::from(e), MAX_RSA_BITS)
            .map_err(|err| crate::malformed_err!("invalid RSA public key: {}", err))?;
        Ok(RsaPublicParams { key })
    }
}

impl From<RsaPublicKey> for RsaPublicParams {
    fn from(key: RsaPublicKey) -> Self {
        RsaPublicParams { key }
    }
}

impl Serialize for RsaPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        Mpi::from(self.key.n()).to_writer(writer)?;
        Mpi::from(self.key.e()).to_writer(writer)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        Mpi::from(self.key.n()).write_len() + Mpi::from(self.key.e()).write_len()
    }
}

/// ECDH key material, RFC 6637 section 9.
#[derive(derive_more::Debug, PartialEq, Eq, Clone)]
pub enum EcdhPublicParams {
    Curve25519 {
        p: x25519_dalek::PublicKey,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
    },
    P256 {
        p: p256::PublicKey,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
    },
    P384 {
        p: p384::PublicKey,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
    },
    /// A curve we can not encrypt to. Everything after the OID is kept verbatim.
    Unsupported {
        curve: ECCCurve,
        #[debug("{}", hex::encode(opaque))]
        opaque: Bytes,
    },
}

impl EcdhPublicParams {
    pub fn try_from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let oid_len = i.read_u8()?;
        crate::ensure_packet!(
            oid_len != 0 && oid_len != 0xFF,
            "reserved curve oid length {}",
            oid_len
        );
        let oid = i.read_take(usize::from(oid_len))?;
        let curve = ECCCurve::from_oid(&oid);

        if !matches!(curve, ECCCurve::Curve25519 | ECCCurve::P256 | ECCCurve::P384) {
            return Ok(EcdhPublicParams::Unsupported {
                curve,
                opaque: i.rest(),
            });
        }

        let p = Mpi::from_buf(i)?;

        let kdf_len = i.read_u8()?;
        crate::ensure_packet!(kdf_len == 3, "invalid kdf parameter length {}", kdf_len);
        let reserved = i.read_u8()?;
        crate::ensure_packet!(reserved == 1, "invalid kdf parameter version {}", reserved);
        let hash = HashAlgorithm::from(i.read_u8()?);
        let alg_sym = SymmetricKeyAlgorithm::from(i.read_u8()?);

        Self::try_from_mpi(&p, curve, hash, alg_sym)
    }

    pub fn try_from_mpi(
        p: &Mpi,
        curve: ECCCurve,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
    ) -> Result<Self> {
        match curve {
            ECCCurve::Curve25519 => {
                let raw = p.as_ref();
                crate::ensure_packet!(
                    raw.len() == 33 && raw[0] == 0x40,
                    "invalid Curve25519 point of {} bytes",
                    raw.len()
                );
                let mut point = [0u8; 32];
                point.copy_from_slice(&raw[1..]);
                Ok(EcdhPublicParams::Curve25519 {
                    p: x25519_dalek::PublicKey::from(point),
                    hash,
                    alg_sym,
                })
            }
            ECCCurve::P256 => Ok(EcdhPublicParams::P256 {
                p: p256::PublicKey::from_sec1_bytes(p.as_ref())?,
                hash,
                alg_sym,
            }),
            ECCCurve::P384 => Ok(EcdhPublicParams::P384 {
                p: p384::PublicKey::from_sec1_bytes(p.as_ref())?,
                hash,
                alg_sym,
            }),
            _ => crate::unsupported_err!("ECDH over {}", curve.name()),
        }
    }

    pub fn curve(&self) -> ECCCurve {
        match self {
            Self::Curve25519 { .. } => ECCCurve::Curve25519,
            Self::P256 { .. } => ECCCurve::P256,
            Self::P384 { .. } => ECCCurve::P384,
            Self::Unsupported { curve, .. } => curve.clone(),
        }
    }

    /// KDF hash and key wrap cipher, absent for unsupported curves.
    pub fn kdf_params(&self) -> Option<(HashAlgorithm, SymmetricKeyAlgorithm)> {
        match self {
            Self::Curve25519 { hash, alg_sym, .. }
            | Self::P256 { hash, alg_sym, .. }
            | Self::P384 { hash, alg_sym, .. } => Some((*hash, *alg_sym)),
            Self::Unsupported { .. } => None,
        }
    }

    /// The public point in its wire form.
    pub fn point(&self) -> Option<Mpi> {
        match self {
            Self::Curve25519 { p, .. } => {
                let mut raw = Vec::with_capacity(33);
                raw.push(0x40);
                raw.extend_from_slice(p.as_bytes());
                Some(Mpi::from_slice(&raw))
            }
            Self::P256 { p, .. } => Some(Mpi::from_slice(p.to_encoded_point(false).as_bytes())),
            Self::P384 { p, .. } => Some(Mpi::from_slice(p.to_encoded_point(false).as_bytes())),
            Self::Unsupported { .. } => None,
        }
    }
}

impl Serialize for EcdhPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let curve = self.curve();
        let oid = curve.oid();
        writer.write_u8(u8::try_from(oid.len())?)?;
        writer.write_all(oid)?;

        match (self.point(), self.kdf_params()) {
            (Some(p), Some((hash, alg_sym))) => {
                p.to_writer(writer)?;
                writer.write_all(&[0x03, 0x01, u8::from(hash), u8::from(alg_sym)])?;
            }
            _ => {
                if let Self::Unsupported { opaque, .. } = self {
                    writer.write_all(opaque)?;
                }
            }
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        let mut sum = 1 + self.curve().oid().len();
        match self {
            Self::Unsupported { opaque, .. } => sum += opaque.len(),
            _ => {
                sum += self.point().map(|p| p.write_len()).unwrap_or_default();
                sum += 4;
            }
        }
        sum
    }
}
