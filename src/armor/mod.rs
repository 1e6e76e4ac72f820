//! # Armor module
//!
//! Armor module provides implementation of ASCII Armor as specified in RFC 4880, section 6.

use std::collections::BTreeMap;
use std::{fmt, io};

use crate::errors::Result;
use crate::ser::Serialize;

mod reader;
mod writer;

pub use self::reader::dearmor;
pub use self::writer::{armor, write};

/// Armor Headers.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Armor block types.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BlockType {
    /// PGP public key
    PublicKey,
    /// PGP private key
    PrivateKey,
    Message,
    Signature,
    /// Any other label, kept verbatim.
    Other(String),
}

impl BlockType {
    /// Maps the label between `BEGIN `/`END ` and the trailing dashes.
    pub fn from_label(label: &str) -> Self {
        match label {
            "PGP PUBLIC KEY BLOCK" => BlockType::PublicKey,
            "PGP PRIVATE KEY BLOCK" => BlockType::PrivateKey,
            "PGP MESSAGE" => BlockType::Message,
            "PGP SIGNATURE" => BlockType::Signature,
            other => BlockType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::PublicKey => f.write_str("PGP PUBLIC KEY BLOCK"),
            BlockType::PrivateKey => f.write_str("PGP PRIVATE KEY BLOCK"),
            BlockType::Message => f.write_str("PGP MESSAGE"),
            BlockType::Signature => f.write_str("PGP SIGNATURE"),
            BlockType::Other(label) => f.write_str(label),
        }
    }
}

impl Serialize for BlockType {
    fn to_writer<W: io::Write>(&self, w: &mut W) -> Result<()> {
        write!(w, "{self}")?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        // allocates, but this is tiny, should be fine
        self.to_string().len()
    }
}
