use std::io;

use log::trace;

use crate::errors::Result;
use crate::packet::{
    CompressedData, LiteralData, PacketTrait, PublicKey, PublicKeyEncryptedSessionKey, RawPacket,
    Signature, SymEncryptedProtectedData, UserId,
};
use crate::ser::Serialize;
use crate::types::Tag;

/// A decoded packet.
///
/// Packets this crate has no use for are carried as raw bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    PublicKey(PublicKey),
    PublicSubkey(PublicKey),
    UserId(UserId),
    Signature(Signature),
    PublicKeyEncryptedSessionKey(PublicKeyEncryptedSessionKey),
    SymEncryptedProtectedData(SymEncryptedProtectedData),
    CompressedData(CompressedData),
    LiteralData(LiteralData),
    Unknown(RawPacket),
}

impl Packet {
    /// Decodes the body of a raw packet according to its tag.
    pub fn from_raw(raw: RawPacket) -> Result<Self> {
        let tag = raw.header.tag();
        trace!("decoding {:?} packet", tag);

        let packet = match tag {
            Tag::PublicKey => Packet::PublicKey(PublicKey::from_buf(tag, raw.body)?),
            Tag::PublicSubkey => Packet::PublicSubkey(PublicKey::from_buf(tag, raw.body)?),
            Tag::UserId => Packet::UserId(UserId::from_buf(raw.body)),
            Tag::Signature => Packet::Signature(Signature::from_buf(raw.body)?),
            Tag::PublicKeyEncryptedSessionKey => Packet::PublicKeyEncryptedSessionKey(
                PublicKeyEncryptedSessionKey::from_buf(raw.body)?,
            ),
            Tag::SymEncryptedProtectedData => {
                Packet::SymEncryptedProtectedData(SymEncryptedProtectedData::from_buf(raw.body)?)
            }
            Tag::CompressedData => Packet::CompressedData(CompressedData::from_buf(raw.body)?),
            Tag::LiteralData => Packet::LiteralData(LiteralData::from_buf(raw.body)?),
            _ => Packet::Unknown(raw),
        };

        Ok(packet)
    }
}

impl Serialize for Packet {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Packet::PublicKey(p) | Packet::PublicSubkey(p) => p.to_writer(writer),
            Packet::UserId(p) => p.to_writer(writer),
            Packet::Signature(p) => p.to_writer(writer),
            Packet::PublicKeyEncryptedSessionKey(p) => p.to_writer(writer),
            Packet::SymEncryptedProtectedData(p) => p.to_writer(writer),
            Packet::CompressedData(p) => p.to_writer(writer),
            Packet::LiteralData(p) => p.to_writer(writer),
            Packet::Unknown(raw) => {
                writer.write_all(&raw.body)?;
                Ok(())
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            Packet::PublicKey(p) | Packet::PublicSubkey(p) => p.write_len(),
            Packet::UserId(p) => p.write_len(),
            Packet::Signature(p) => p.write_len(),
            Packet::PublicKeyEncryptedSessionKey(p) => p.write_len(),
            Packet::SymEncryptedProtectedData(p) => p.write_len(),
            Packet::CompressedData(p) => p.write_len(),
            Packet::LiteralData(p) => p.write_len(),
            Packet::Unknown(raw) => raw.body.len(),
        }
    }
}

impl PacketTrait for Packet {
    fn tag(&self) -> Tag {
        match self {
            Packet::PublicKey(_) => Tag::PublicKey,
            Packet::PublicSubkey(_) => Tag::PublicSubkey,
            Packet::UserId(_) => Tag::UserId,
            Packet::Signature(_) => Tag::Signature,
            Packet::PublicKeyEncryptedSessionKey(_) => Tag::PublicKeyEncryptedSessionKey,
            Packet::SymEncryptedProtectedData(_) => Tag::SymEncryptedProtectedData,
            Packet::CompressedData(_) => Tag::CompressedData,
            Packet::LiteralData(_) => Tag::LiteralData,
            Packet::Unknown(raw) => raw.header.tag(),
        }
    }
}
