#![allow(dead_code)]

use std::sync::OnceLock;

use aes::cipher::generic_array::GenericArray;
use aes::Aes256;
use aes_kw::KekAes128;
use bytes::Bytes;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use cfb_mode::Decryptor;
use chrono::{TimeZone, Utc};
use pgpenc::armor::{self, BlockType};
use pgpenc::crypto::{HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use pgpenc::packet::{
    read_packet, write_packet, CompressedData, LiteralData, Packet, PacketParser, PublicKey,
};
use pgpenc::types::{
    EcdhPublicParams, KeyId, PkeskBytes, PublicParams, RsaPublicParams, Tag,
};
use pgpenc::Serialize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use x25519_dalek::StaticSecret;

/// Curve25519 OID as used in OpenPGP ECDH keys.
const CURVE25519_OID: [u8; 10] = [0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01];

/// A v4 positive certification with empty subpacket areas and a dummy MPI.
const CERT_SIG: &[u8] = &[4, 0x13, 1, 8, 0, 0, 0, 0, 0xAB, 0xCD, 0x00, 0x01, 0x01];
/// A v4 subkey binding signature shaped like `CERT_SIG`.
const BINDING_SIG: &[u8] = &[4, 0x18, 1, 8, 0, 0, 0, 0, 0xAB, 0xCD, 0x00, 0x01, 0x01];

pub enum TestSecret {
    Rsa(RsaPrivateKey),
    X25519(StaticSecret),
    /// Secret material this helper can not decrypt with.
    None,
}

pub struct TestKey {
    pub public: PublicKey,
    pub secret: TestSecret,
}

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

fn created() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 3, 14, 15, 9, 26).unwrap()
}

/// The RSA-2048 fixture key, generated once per test binary.
pub fn rsa_2048() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = ChaCha8Rng::seed_from_u64(2048);
        RsaPrivateKey::new(&mut rng, 2048).unwrap()
    })
}

pub fn rsa_key(tag: Tag, algorithm: PublicKeyAlgorithm) -> TestKey {
    let secret = rsa_2048().clone();
    let params = PublicParams::RSA(RsaPublicParams {
        key: RsaPublicKey::from(&secret),
    });
    TestKey {
        public: PublicKey::from_params(tag, created(), algorithm, params).unwrap(),
        secret: TestSecret::Rsa(secret),
    }
}

pub fn x25519_key(tag: Tag, seed: u8) -> TestKey {
    let secret = StaticSecret::from([seed; 32]);
    let params = PublicParams::ECDH(EcdhPublicParams::Curve25519 {
        p: x25519_dalek::PublicKey::from(&secret),
        hash: HashAlgorithm::Sha256,
        alg_sym: SymmetricKeyAlgorithm::AES128,
    });
    TestKey {
        public: PublicKey::from_params(tag, created(), PublicKeyAlgorithm::ECDH, params).unwrap(),
        secret: TestSecret::X25519(secret),
    }
}

/// A sign-only DSA key with placeholder parameters.
pub fn dsa_key(tag: Tag) -> TestKey {
    let mut body = vec![4, 0x64, 0x10, 0x8E, 0x1E, 17];
    for mpi in [[0x00, 0x08, 0xFF], [0x00, 0x08, 0xFE], [0x00, 0x08, 0x81], [0x00, 0x08, 0x82]] {
        body.extend_from_slice(&mpi);
    }
    TestKey {
        public: PublicKey::from_buf(tag, body.into()).unwrap(),
        secret: TestSecret::None,
    }
}

/// Binary transferable public key: primary, one user id and the given subkeys.
pub fn key_ring_bytes(primary: &PublicKey, subkeys: &[&PublicKey]) -> Vec<u8> {
    let mut out = Vec::new();
    write_packet(&mut out, Tag::PublicKey, &primary.to_bytes().unwrap()).unwrap();
    write_packet(&mut out, Tag::UserId, b"Test <test@example.org>").unwrap();
    write_packet(&mut out, Tag::Signature, CERT_SIG).unwrap();
    for subkey in subkeys {
        write_packet(&mut out, Tag::PublicSubkey, &subkey.to_bytes().unwrap()).unwrap();
        write_packet(&mut out, Tag::Signature, BINDING_SIG).unwrap();
    }
    out
}

pub fn key_block(primary: &PublicKey, subkeys: &[&PublicKey]) -> String {
    armor::armor(
        BlockType::PublicKey,
        None,
        &key_ring_bytes(primary, subkeys),
    )
    .unwrap()
}

/// What a recipient learns from a message.
pub struct Decrypted {
    pub key_id: KeyId,
    pub algorithm: PublicKeyAlgorithm,
    pub pkesk: PkeskBytes,
    /// Length of the SEIP ciphertext, without the version byte.
    pub seip_len: usize,
    pub compressed: CompressedData,
    pub literal: LiteralData,
}

/// Decrypts an armored message with the secret half of `key`, checking every layer.
pub fn decrypt(message: &str, key: &TestKey) -> Decrypted {
    let (typ, _, data) = armor::dearmor(message).unwrap();
    assert_eq!(typ, BlockType::Message);

    let packets: Vec<Packet> = PacketParser::new(data)
        .map(|p| p.and_then(Packet::from_raw).unwrap())
        .collect();
    let [Packet::PublicKeyEncryptedSessionKey(esk), Packet::SymEncryptedProtectedData(seip)] =
        &packets[..]
    else {
        panic!("unexpected packet sequence {packets:?}");
    };

    let values = esk.values().unwrap().clone();
    let plain = match (&key.secret, &values) {
        (TestSecret::Rsa(secret), PkeskBytes::Rsa { mpi }) => {
            let mut ciphertext = vec![0u8; secret.size() - mpi.len()];
            ciphertext.extend_from_slice(mpi.as_ref());
            secret.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap()
        }
        (
            TestSecret::X25519(secret),
            PkeskBytes::Ecdh {
                public_point,
                encrypted_session_key,
            },
        ) => ecdh_x25519_unwrap(
            secret,
            &key.public,
            public_point.as_ref(),
            encrypted_session_key,
        ),
        _ => panic!("can not decrypt {values:?}"),
    };

    // algorithm, session key, checksum
    assert_eq!(plain.len(), 35);
    assert_eq!(plain[0], u8::from(SymmetricKeyAlgorithm::AES256));
    let session_key = &plain[1..33];
    let checksum = session_key
        .iter()
        .fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)));
    assert_eq!(&plain[33..], &checksum.to_be_bytes());

    let mut data = seip.data().to_vec();
    Decryptor::<Aes256>::new_from_slices(session_key, &[0u8; 16])
        .unwrap()
        .decrypt(&mut data);

    // quick check and modification detection code
    assert_eq!(data[14..16], data[16..18]);
    let (protected, mdc) = data.split_at(data.len() - 20);
    assert_eq!(&protected[protected.len() - 2..], &[0xD3, 0x14]);
    assert_eq!(&Sha1::digest(protected)[..], mdc);
    let inner = &protected[18..protected.len() - 2];

    let mut inner = Bytes::copy_from_slice(inner);
    let raw = read_packet(&mut inner).unwrap();
    assert!(inner.is_empty(), "trailing data after the compressed packet");
    let Packet::CompressedData(compressed) = Packet::from_raw(raw).unwrap() else {
        panic!("expected a compressed data packet");
    };

    let mut literal = Bytes::copy_from_slice(&compressed.decompress().unwrap());
    let raw = read_packet(&mut literal).unwrap();
    assert!(literal.is_empty(), "trailing data after the literal packet");
    let Packet::LiteralData(literal) = Packet::from_raw(raw).unwrap() else {
        panic!("expected a literal data packet");
    };

    Decrypted {
        key_id: *esk.id().unwrap(),
        algorithm: esk.algorithm().unwrap(),
        pkesk: values,
        seip_len: seip.data().len(),
        compressed,
        literal,
    }
}

/// RFC 6637 decryption for a Curve25519 key with SHA-256 and AES-128.
fn ecdh_x25519_unwrap(
    secret: &StaticSecret,
    public: &PublicKey,
    ephemeral: &[u8],
    wrapped: &[u8],
) -> Vec<u8> {
    assert_eq!(ephemeral.len(), 33);
    assert_eq!(ephemeral[0], 0x40);
    let mut point = [0u8; 32];
    point.copy_from_slice(&ephemeral[1..]);
    let shared = secret.diffie_hellman(&x25519_dalek::PublicKey::from(point));

    let mut param = vec![CURVE25519_OID.len() as u8];
    param.extend_from_slice(&CURVE25519_OID);
    param.extend_from_slice(&[18, 0x03, 0x01, 8, 7]);
    param.extend_from_slice(b"Anonymous Sender    ");
    param.extend_from_slice(public.fingerprint().as_ref());

    let mut hasher = Sha256::new();
    hasher.update([0, 0, 0, 1]);
    hasher.update(shared.as_bytes());
    hasher.update(&param);
    let kek = hasher.finalize();

    let mut padded = vec![0u8; wrapped.len() - 8];
    KekAes128::new(GenericArray::from_slice(&kek[..16]))
        .unwrap(wrapped, &mut padded)
        .unwrap();

    let pad = *padded.last().unwrap() as usize;
    assert!((1..=8).contains(&pad));
    assert!(padded[padded.len() - pad..].iter().all(|b| *b as usize == pad));
    padded.truncate(padded.len() - pad);
    padded
}
