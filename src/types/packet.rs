use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;
use crate::parsing::BufParsing;

/// Largest partial body chunk that can be expressed, 2^30 bytes.
pub const MAX_PARTIAL_LEN: u32 = 1 << 30;

/// Represents the packet length.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PacketLength {
    Fixed(u32),
    /// Old format length type 3, the body extends to the end of the input.
    Indeterminate,
    Partial(u32),
}

impl PacketLength {
    /// Returns how many bytes encoding the given length as new style fixed length needs.
    pub fn fixed_encoding_len(len: u32) -> usize {
        if len < 192 {
            1
        } else if len < 8384 {
            2
        } else {
            5
        }
    }

    /// Reads a new style length.
    pub fn from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let olen = i.read_u8()?;
        let len = match olen {
            0..=191 => PacketLength::Fixed(olen.into()),
            192..=223 => {
                let a = i.read_u8()?;
                PacketLength::Fixed(((u32::from(olen) - 192) << 8) + 192 + u32::from(a))
            }
            224..=254 => PacketLength::Partial(1 << (olen & 0x1F)),
            255 => PacketLength::Fixed(i.read_be_u32()?),
        };
        Ok(len)
    }

    /// Writes a new style length.
    ///
    /// Partial lengths must be powers of two, indeterminate lengths do not exist
    /// in the new format and are rejected.
    pub fn to_writer_new<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match *self {
            PacketLength::Fixed(len) => {
                if len < 192 {
                    writer.write_u8(len as u8)?;
                } else if len < 8384 {
                    writer.write_u8((((len - 192) >> 8) + 192) as u8)?;
                    writer.write_u8(((len - 192) & 0xFF) as u8)?;
                } else {
                    writer.write_u8(255)?;
                    writer.write_u32::<BigEndian>(len)?;
                }
            }
            PacketLength::Indeterminate => {
                crate::bail_malformed!("indeterminate length in a new format header");
            }
            PacketLength::Partial(len) => {
                crate::ensure_packet!(
                    len.is_power_of_two() && len <= MAX_PARTIAL_LEN,
                    "invalid partial length {}",
                    len
                );
                writer.write_u8(224 + len.trailing_zeros() as u8)?;
            }
        }
        Ok(())
    }
}

/// Packet tag, RFC 4880 section 4.3.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum Tag {
    PublicKeyEncryptedSessionKey = 1,
    Signature = 2,
    SymKeyEncryptedSessionKey = 3,
    OnePassSignature = 4,
    SecretKey = 5,
    PublicKey = 6,
    SecretSubkey = 7,
    CompressedData = 8,
    SymEncryptedData = 9,
    Marker = 10,
    LiteralData = 11,
    Trust = 12,
    UserId = 13,
    PublicSubkey = 14,
    UserAttribute = 17,
    SymEncryptedProtectedData = 18,
    ModDetectionCode = 19,
    Padding = 21,

    #[num_enum(catch_all)]
    #[cfg_attr(test, proptest(skip))]
    Other(u8),
}

impl Tag {
    /// Packets that only ever appear inside messages.
    pub fn is_message_packet(self) -> bool {
        matches!(
            self,
            Tag::PublicKeyEncryptedSessionKey
                | Tag::SymKeyEncryptedSessionKey
                | Tag::OnePassSignature
                | Tag::CompressedData
                | Tag::SymEncryptedData
                | Tag::LiteralData
                | Tag::SymEncryptedProtectedData
                | Tag::ModDetectionCode
        )
    }
}

/// The version of the packet header format.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PacketHeaderVersion {
    /// Old Packet Format
    Old,
    /// New Packet Format
    #[default]
    New,
}

/// Public key packet version. Only v4 keys are understood.
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KeyVersion {
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,

    #[num_enum(catch_all)]
    Other(u8),
}

#[allow(clippy::derivable_impls)]
impl Default for KeyVersion {
    fn default() -> Self {
        Self::V4
    }
}
