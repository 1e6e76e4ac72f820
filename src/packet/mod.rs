//! # Packet module
//!
//! Reading and writing of the OpenPGP packets, RFC 4880 section 4 and 5, needed to
//! consume a transferable public key and to produce an encrypted message.
//!
//! ```rust
//! use bytes::Bytes;
//! use pgpenc::packet::{write_packet, Packet, PacketParser};
//! use pgpenc::types::Tag;
//!
//! let mut out = Vec::new();
//! write_packet(&mut out, Tag::UserId, b"Alice <alice@example.org>").unwrap();
//!
//! let packet = PacketParser::new(Bytes::from(out))
//!     .next()
//!     .unwrap()
//!     .and_then(Packet::from_raw)
//!     .unwrap();
//! assert!(matches!(packet, Packet::UserId(_)));
//! ```

use std::io;

use log::debug;

use crate::errors::{Error, Result};
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag, MAX_PARTIAL_LEN};

mod compressed_data;
mod header;
mod literal_data;
mod packet_sum;
mod public_key;
mod public_key_encrypted_session_key;
mod reader;
mod signature;
mod sym_encrypted_protected_data;
mod user_id;

pub use self::compressed_data::CompressedData;
pub use self::header::PacketHeader;
pub use self::literal_data::{DataMode, LiteralData, MAX_FILE_NAME_LEN};
pub use self::packet_sum::Packet;
pub use self::public_key::PublicKey;
pub use self::public_key_encrypted_session_key::PublicKeyEncryptedSessionKey;
pub use self::reader::{read_packet, PacketParser, RawPacket};
pub use self::signature::{Signature, SignatureType};
pub use self::sym_encrypted_protected_data::SymEncryptedProtectedData;
pub use self::user_id::UserId;

/// Smallest allowed partial body chunk, RFC 4880 section 4.2.2.4.
pub const MIN_PARTIAL_CHUNK: u32 = 512;

pub trait PacketTrait: Serialize {
    fn tag(&self) -> Tag;

    /// Writes the packet with a new format, fixed length header.
    fn to_writer_with_header<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let len = body_len(self.write_len())?;
        PacketHeader::new_fixed(self.tag(), len).to_writer(writer)?;
        self.to_writer(writer)
    }
}

impl<T: PacketTrait> PacketTrait for &T {
    fn tag(&self) -> Tag {
        (*self).tag()
    }
}

fn body_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::InputTooLarge {
        size: len,
        max: u32::MAX as usize,
    })
}

/// Writes a single packet with a new format, fixed length header.
pub fn write_packet<W: io::Write>(writer: &mut W, tag: Tag, body: &[u8]) -> Result<()> {
    let header = PacketHeader::new_fixed(tag, body_len(body.len())?);
    debug!("write {:?} packet, {} bytes", tag, body.len());
    header.to_writer(writer)?;
    writer.write_all(body)?;

    Ok(())
}

/// Writes a single packet using partial body lengths of `chunk_size`.
///
/// Bodies shorter than one chunk are written with a fixed length. Otherwise every
/// chunk but the last is a partial one, the last length is always fixed and may be zero.
pub fn write_packet_partial<W: io::Write>(
    writer: &mut W,
    tag: Tag,
    body: &[u8],
    chunk_size: u32,
) -> Result<()> {
    crate::ensure_packet!(
        chunk_size.is_power_of_two()
            && (MIN_PARTIAL_CHUNK..=MAX_PARTIAL_LEN).contains(&chunk_size),
        "invalid partial chunk size {}",
        chunk_size
    );

    let chunk = chunk_size as usize;
    if body.len() < chunk {
        return write_packet(writer, tag, body);
    }

    debug!(
        "write {:?} packet, {} bytes in chunks of {}",
        tag,
        body.len(),
        chunk_size
    );
    let header = PacketHeader::from_parts(
        PacketHeaderVersion::New,
        tag,
        PacketLength::Partial(chunk_size),
    )?;
    header.to_writer(writer)?;

    let mut chunks = body.chunks_exact(chunk);
    for (n, part) in chunks.by_ref().enumerate() {
        if n > 0 {
            PacketLength::Partial(chunk_size).to_writer_new(writer)?;
        }
        writer.write_all(part)?;
    }
    let last = chunks.remainder();
    PacketLength::Fixed(body_len(last.len())?).to_writer_new(writer)?;
    writer.write_all(last)?;

    Ok(())
}
