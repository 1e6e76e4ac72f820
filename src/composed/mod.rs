//! # Composed module
//!
//! Transferable public keys and the encryption pipeline built on top of the packets.

mod config;
mod encryptor;
mod key_ring;

pub use self::config::{EncryptConfig, DEFAULT_FILE_NAME};
pub use self::encryptor::{Encryptor, SESSION_KEY_ALGORITHM};
pub use self::key_ring::{PublicKeyRing, PublicSubkeyEntry, SignedUserId};
