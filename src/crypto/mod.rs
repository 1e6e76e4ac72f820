//! # Cryptography module

pub mod aes_kw;
pub mod checksum;
pub mod ecc_curve;
pub mod ecdh;
pub mod hash;
pub mod public_key;
pub mod rsa;
pub mod sym;

pub use self::ecc_curve::ECCCurve;
pub use self::hash::HashAlgorithm;
pub use self::public_key::PublicKeyAlgorithm;
pub use self::sym::SymmetricKeyAlgorithm;
