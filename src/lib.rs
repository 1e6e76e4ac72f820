//! # pgpenc
//!
//! Encrypts payloads to an OpenPGP public key, RFC 4880.
//!
//! The produced message is an ASCII armored `PKESK || SEIP(compressed(literal))`
//! packet sequence that any OpenPGP implementation holding the matching secret
//! key can decrypt. RSA and ECDH (Curve25519, P-256, P-384) recipients are supported.
//!
//! ```rust,no_run
//! # fn run(key_block: &str) -> pgpenc::errors::Result<()> {
//! let message = pgpenc::encrypt(key_block, b"attack at dawn")?;
//! println!("{message}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::style,
    clippy::perf,
    clippy::complexity,
    clippy::correctness,
    rust_2018_idioms
)]
#![allow(clippy::missing_const_for_fn, clippy::use_self)]

#[macro_use]
pub mod errors;

pub mod armor;
pub mod composed;
pub mod crypto;
pub mod packet;
pub mod types;

mod line_writer;
mod parsing;
mod ser;

pub use self::composed::{EncryptConfig, Encryptor, PublicKeyRing};
pub use self::ser::Serialize;

/// Encrypts `plaintext` to the encryption key of the armored `public_key_block`,
/// with the default framing.
pub fn encrypt(public_key_block: &str, plaintext: &[u8]) -> errors::Result<String> {
    Encryptor::new(public_key_block)?.encrypt(plaintext)
}
