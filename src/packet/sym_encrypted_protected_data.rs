use std::io;

use byteorder::WriteBytesExt;
use bytes::Bytes;
use rand::{CryptoRng, Rng};

use crate::errors::Result;
use crate::packet::PacketTrait;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{SessionKey, Tag};

/// Symmetrically Encrypted Integrity Protected Data Packet, version 1
/// <https://tools.ietf.org/html/rfc4880.html#section-5.13>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SymEncryptedProtectedData {
    #[debug("{} bytes", data.len())]
    data: Bytes,
}

impl SymEncryptedProtectedData {
    /// Parses a `SymEncryptedProtectedData` packet body.
    pub fn from_buf(mut i: Bytes) -> Result<Self> {
        let version = i.read_u8()?;
        if version != 1 {
            crate::unsupported_err!("SymEncryptedProtectedData version {}", version);
        }
        let data = i.rest();
        crate::ensure_packet!(!data.is_empty(), "empty encrypted data");

        Ok(SymEncryptedProtectedData { data })
    }

    /// Encrypts the plaintext, usually a serialized packet sequence, with the session key.
    pub fn encrypt_with_rng<R: CryptoRng + Rng>(
        rng: R,
        session_key: &SessionKey,
        plaintext: &[u8],
    ) -> Result<Self> {
        let data = session_key.algorithm().encrypt_protected(
            rng,
            session_key.as_bytes(),
            plaintext,
        )?;

        Ok(SymEncryptedProtectedData { data: data.into() })
    }

    /// The ciphertext, without the version byte.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Serialize for SymEncryptedProtectedData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(0x01)?;
        writer.write_all(&self.data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.data.len()
    }
}

impl PacketTrait for SymEncryptedProtectedData {
    fn tag(&self) -> Tag {
        Tag::SymEncryptedProtectedData
    }
}
