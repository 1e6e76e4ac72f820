use elliptic_curve::sec1::ToEncodedPoint;
use log::debug;
use rand::{CryptoRng, Rng};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::{aes_kw, HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use crate::errors::Result;
use crate::types::{EcdhPublicParams, Mpi, PkeskBytes};

/// 20 octets representing "Anonymous Sender    ".
const ANON_SENDER: [u8; 20] = *b"Anonymous Sender    ";

const KDF_COUNTER: [u8; 4] = [0, 0, 0, 1];

/// The wrapped key length is written as a single byte.
const MAX_WRAPPED_LEN: usize = 255;

/// Builds the KDF parameter block of RFC 6637 section 8.
pub fn build_ecdh_param(
    oid: &[u8],
    alg_sym: SymmetricKeyAlgorithm,
    hash: HashAlgorithm,
    fingerprint: &[u8],
) -> Vec<u8> {
    let mut param = Vec::with_capacity(1 + oid.len() + 5 + ANON_SENDER.len() + fingerprint.len());
    param.push(oid.len() as u8);
    param.extend_from_slice(oid);
    param.push(u8::from(PublicKeyAlgorithm::ECDH));
    param.extend_from_slice(&[0x03, 0x01, u8::from(hash), u8::from(alg_sym)]);
    param.extend_from_slice(&ANON_SENDER);
    param.extend_from_slice(fingerprint);

    param
}

/// Key derivation function, RFC 6637 section 7.
///
/// A single round: `Hash(00 00 00 01 || Z || param)` truncated to `length`.
pub fn kdf(hash: HashAlgorithm, z: &[u8], length: usize, param: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut digest = Zeroizing::new(hash.digest(&[&KDF_COUNTER[..], z, param])?);
    crate::ensure_packet!(
        digest.len() >= length,
        "{} can not produce a {} byte key",
        hash,
        length
    );
    digest.truncate(length);

    Ok(digest)
}

/// PKCS#5 padding to a multiple of 8 bytes. A full block is added to aligned input.
pub fn pad(plain: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad_len = 8 - plain.len() % 8;
    let mut padded = Zeroizing::new(Vec::with_capacity(plain.len() + pad_len));
    padded.extend_from_slice(plain);
    padded.resize(plain.len() + pad_len, pad_len as u8);

    padded
}

/// Encrypts `plain` to the recipient's ECDH key.
///
/// `fingerprint` is the v4 fingerprint of the recipient key, bound into the KDF.
pub fn encrypt<R: CryptoRng + Rng>(
    mut rng: R,
    params: &EcdhPublicParams,
    fingerprint: &[u8],
    plain: &[u8],
) -> Result<PkeskBytes> {
    debug!("ECDH encrypt to {}", params.curve().name());

    let Some((hash, alg_sym)) = params.kdf_params() else {
        crate::unsupported_err!("ECDH over {}", params.curve().name());
    };
    if !alg_sym.is_supported() {
        crate::unsupported_err!("ECDH key wrap with {:?}", alg_sym);
    }
    if hash.digest_size().is_none() {
        crate::unsupported_err!("ECDH kdf hash {}", hash);
    }

    let (shared_secret, ephemeral) = match params {
        EcdhPublicParams::Curve25519 { p, .. } => {
            let mut secret_bytes = Zeroizing::new([0u8; 32]);
            rng.fill_bytes(&mut *secret_bytes);
            let secret = StaticSecret::from(*secret_bytes);
            let shared = secret.diffie_hellman(p);

            let mut ephemeral = Vec::with_capacity(33);
            ephemeral.push(0x40);
            ephemeral.extend_from_slice(PublicKey::from(&secret).as_bytes());

            (Zeroizing::new(shared.as_bytes().to_vec()), ephemeral)
        }
        EcdhPublicParams::P256 { p, .. } => {
            let secret = p256::ecdh::EphemeralSecret::random(&mut rng);
            let shared = secret.diffie_hellman(p);
            let ephemeral = secret.public_key().to_encoded_point(false).as_bytes().to_vec();

            (Zeroizing::new(shared.raw_secret_bytes().to_vec()), ephemeral)
        }
        EcdhPublicParams::P384 { p, .. } => {
            let secret = p384::ecdh::EphemeralSecret::random(&mut rng);
            let shared = secret.diffie_hellman(p);
            let ephemeral = secret.public_key().to_encoded_point(false).as_bytes().to_vec();

            (Zeroizing::new(shared.raw_secret_bytes().to_vec()), ephemeral)
        }
        EcdhPublicParams::Unsupported { curve, .. } => {
            crate::unsupported_err!("ECDH over {}", curve.name())
        }
    };

    let param = build_ecdh_param(params.curve().oid(), alg_sym, hash, fingerprint);
    let z = kdf(hash, &shared_secret, alg_sym.key_size(), &param)?;

    let padded = pad(plain);
    let wrapped = aes_kw::wrap(&z, &padded)?;
    if wrapped.len() > MAX_WRAPPED_LEN {
        return Err(crate::errors::Error::InputTooLarge {
            size: wrapped.len(),
            max: MAX_WRAPPED_LEN,
        });
    }

    Ok(PkeskBytes::Ecdh {
        public_point: Mpi::from_slice(&ephemeral),
        encrypted_session_key: wrapped.into(),
    })
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const FINGERPRINT: [u8; 20] = hex!("25A0D2B10F2D6A3C1D7E2B4C5F6A7B8C9D0E1F20");

    fn unpad(padded: &[u8]) -> &[u8] {
        let n = *padded.last().unwrap() as usize;
        assert!((1..=8).contains(&n));
        assert!(padded[padded.len() - n..].iter().all(|b| *b as usize == n));
        &padded[..padded.len() - n]
    }

    #[test]
    fn test_build_ecdh_param() {
        let param = build_ecdh_param(
            &hex!("2B060104019755010501"),
            SymmetricKeyAlgorithm::AES128,
            HashAlgorithm::Sha256,
            &FINGERPRINT,
        );
        let mut expected = hex!("0A 2B060104019755010501 12 03010807").to_vec();
        expected.extend_from_slice(b"Anonymous Sender    ");
        expected.extend_from_slice(&FINGERPRINT);
        assert_eq!(param, expected);
    }

    #[test]
    fn test_pad() {
        assert_eq!(&pad(&[1, 2, 3])[..], &[1, 2, 3, 5, 5, 5, 5, 5]);
        assert_eq!(pad(&[0u8; 8]).len(), 16);
        // 35 byte session key plaintext pads to 40
        assert_eq!(&pad(&[0u8; 35])[35..], &[5u8; 5]);
    }

    #[test]
    fn test_kdf_truncates() {
        let z = kdf(HashAlgorithm::Sha512, &[1u8; 32], 32, b"param").unwrap();
        assert_eq!(z.len(), 32);
        let full = HashAlgorithm::Sha512
            .digest(&[&KDF_COUNTER[..], &[1u8; 32][..], &b"param"[..]])
            .unwrap();
        assert_eq!(&z[..], &full[..32]);

        assert!(kdf(HashAlgorithm::Sha1, &[1u8; 32], 32, b"param").is_err());
    }

    #[test]
    fn test_encrypt_x25519() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let recipient = StaticSecret::from([9u8; 32]);
        let params = EcdhPublicParams::Curve25519 {
            p: PublicKey::from(&recipient),
            hash: HashAlgorithm::Sha256,
            alg_sym: SymmetricKeyAlgorithm::AES128,
        };
        let plain = [9u8; 35];

        let PkeskBytes::Ecdh {
            public_point,
            encrypted_session_key,
        } = encrypt(&mut rng, &params, &FINGERPRINT, &plain).unwrap()
        else {
            panic!("expected ecdh values");
        };
        assert_eq!(public_point.len(), 33);
        assert_eq!(public_point.as_ref()[0], 0x40);
        assert_eq!(encrypted_session_key.len(), 48);

        let mut ephemeral = [0u8; 32];
        ephemeral.copy_from_slice(&public_point.as_ref()[1..]);
        let shared = recipient.diffie_hellman(&PublicKey::from(ephemeral));
        let param = build_ecdh_param(
            &hex!("2B060104019755010501"),
            SymmetricKeyAlgorithm::AES128,
            HashAlgorithm::Sha256,
            &FINGERPRINT,
        );
        let z = kdf(HashAlgorithm::Sha256, shared.as_bytes(), 16, &param).unwrap();
        let padded = aes_kw::unwrap(&z, &encrypted_session_key).unwrap();
        assert_eq!(unpad(&padded), &plain[..]);
    }

    #[test]
    fn test_encrypt_p256() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let recipient = p256::SecretKey::random(&mut rng);
        let params = EcdhPublicParams::P256 {
            p: recipient.public_key(),
            hash: HashAlgorithm::Sha256,
            alg_sym: SymmetricKeyAlgorithm::AES128,
        };
        let plain = [1u8; 35];

        let PkeskBytes::Ecdh {
            public_point,
            encrypted_session_key,
        } = encrypt(&mut rng, &params, &FINGERPRINT, &plain).unwrap()
        else {
            panic!("expected ecdh values");
        };
        assert_eq!(public_point.len(), 65);
        assert_eq!(public_point.as_ref()[0], 0x04);

        let ephemeral = p256::PublicKey::from_sec1_bytes(public_point.as_ref()).unwrap();
        let shared = p256::ecdh::diffie_hellman(recipient.to_nonzero_scalar(), ephemeral.as_affine());
        let param = build_ecdh_param(
            &hex!("2A8648CE3D030107"),
            SymmetricKeyAlgorithm::AES128,
            HashAlgorithm::Sha256,
            &FINGERPRINT,
        );
        let z = kdf(HashAlgorithm::Sha256, shared.raw_secret_bytes(), 16, &param).unwrap();
        let padded = aes_kw::unwrap(&z, &encrypted_session_key).unwrap();
        assert_eq!(unpad(&padded), &plain[..]);
    }

    #[test]
    fn test_encrypt_p384() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let recipient = p384::SecretKey::random(&mut rng);
        let params = EcdhPublicParams::P384 {
            p: recipient.public_key(),
            hash: HashAlgorithm::Sha384,
            alg_sym: SymmetricKeyAlgorithm::AES256,
        };
        let plain = [2u8; 35];

        let PkeskBytes::Ecdh {
            public_point,
            encrypted_session_key,
        } = encrypt(&mut rng, &params, &FINGERPRINT, &plain).unwrap()
        else {
            panic!("expected ecdh values");
        };
        assert_eq!(public_point.len(), 97);
        assert_eq!(public_point.as_ref()[0], 0x04);
        assert_eq!(encrypted_session_key.len(), 48);

        let ephemeral = p384::PublicKey::from_sec1_bytes(public_point.as_ref()).unwrap();
        let shared = p384::ecdh::diffie_hellman(recipient.to_nonzero_scalar(), ephemeral.as_affine());
        let param = build_ecdh_param(
            &hex!("2B81040022"),
            SymmetricKeyAlgorithm::AES256,
            HashAlgorithm::Sha384,
            &FINGERPRINT,
        );
        let z = kdf(HashAlgorithm::Sha384, shared.raw_secret_bytes(), 32, &param).unwrap();
        let padded = aes_kw::unwrap(&z, &encrypted_session_key).unwrap();
        assert_eq!(unpad(&padded), &plain[..]);
    }

    #[test]
    fn test_encrypt_unsupported_curve() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let params = EcdhPublicParams::Unsupported {
            curve: crate::crypto::ECCCurve::P521,
            opaque: bytes::Bytes::new(),
        };
        let err = encrypt(&mut rng, &params, &FINGERPRINT, &[0u8; 35]).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::UnsupportedAlgorithm);
    }
}
