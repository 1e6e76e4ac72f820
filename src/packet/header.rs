use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use log::trace;

use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag, MAX_PARTIAL_LEN};

/// A packet header, RFC 4880 section 4.2.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

impl PacketHeader {
    /// Parse a single packet header from the given buffer.
    pub fn from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let ctb = i.read_u8()?;

        let header = match ctb & 0b1100_0000 {
            0b1100_0000 => {
                let tag = Tag::from(ctb & 0b0011_1111);
                let length = PacketLength::from_buf(i)?;
                PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                }
            }
            0b1000_0000 => {
                let tag = Tag::from((ctb >> 2) & 0b0000_1111);
                let length = match ctb & 0b0000_0011 {
                    0 => PacketLength::Fixed(i.read_u8()?.into()),
                    1 => PacketLength::Fixed(i.read_be_u16()?.into()),
                    2 => PacketLength::Fixed(i.read_be_u32()?),
                    _ => PacketLength::Indeterminate,
                };
                PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                }
            }
            _ => crate::bail_malformed!("invalid packet header byte {:#04x}", ctb),
        };

        crate::ensure_packet!(header.tag != Tag::Other(0), "reserved packet tag 0");
        trace!("read packet header {:?}", header);

        Ok(header)
    }

    pub fn from_parts(version: PacketHeaderVersion, tag: Tag, length: PacketLength) -> Result<Self> {
        let tag_id = u8::from(tag);
        crate::ensure_packet!(tag_id != 0, "reserved packet tag 0");

        match version {
            PacketHeaderVersion::Old => {
                crate::ensure_packet!(
                    tag_id < 16,
                    "tag {} does not fit an old format header",
                    tag_id
                );
                crate::ensure_packet!(
                    !matches!(length, PacketLength::Partial(_)),
                    "partial lengths need a new format header"
                );
            }
            PacketHeaderVersion::New => {
                crate::ensure_packet!(
                    tag_id < 64,
                    "tag {} does not fit a new format header",
                    tag_id
                );
                match length {
                    PacketLength::Indeterminate => {
                        crate::bail_malformed!("indeterminate lengths need an old format header")
                    }
                    PacketLength::Partial(l) => {
                        crate::ensure_packet!(
                            l.is_power_of_two() && l <= MAX_PARTIAL_LEN,
                            "invalid partial length {}",
                            l
                        );
                    }
                    PacketLength::Fixed(_) => {}
                }
            }
        }

        Ok(PacketHeader {
            version,
            tag,
            length,
        })
    }

    /// A new format header with a fixed length.
    pub fn new_fixed(tag: Tag, length: u32) -> Self {
        PacketHeader {
            version: PacketHeaderVersion::New,
            tag,
            length: PacketLength::Fixed(length),
        }
    }

    pub fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn packet_length(&self) -> PacketLength {
        self.length
    }
}

impl Serialize for PacketHeader {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let tag_id = u8::from(self.tag);
        match self.version {
            PacketHeaderVersion::New => {
                writer.write_u8(0b1100_0000 | tag_id)?;
                self.length.to_writer_new(writer)?;
            }
            PacketHeaderVersion::Old => {
                let ctb = 0b1000_0000 | (tag_id << 2);
                match self.length {
                    PacketLength::Fixed(len) if len < 256 => {
                        writer.write_all(&[ctb, len as u8])?;
                    }
                    PacketLength::Fixed(len) if len < 65536 => {
                        writer.write_u8(ctb | 1)?;
                        writer.write_u16::<BigEndian>(len as u16)?;
                    }
                    PacketLength::Fixed(len) => {
                        writer.write_u8(ctb | 2)?;
                        writer.write_u32::<BigEndian>(len)?;
                    }
                    PacketLength::Indeterminate => writer.write_u8(ctb | 3)?,
                    PacketLength::Partial(_) => {
                        crate::bail_malformed!("partial lengths need a new format header")
                    }
                }
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match (self.version, self.length) {
            (PacketHeaderVersion::New, PacketLength::Fixed(len)) => {
                1 + PacketLength::fixed_encoding_len(len)
            }
            (PacketHeaderVersion::New, _) => 2,
            (PacketHeaderVersion::Old, PacketLength::Fixed(len)) if len < 256 => 2,
            (PacketHeaderVersion::Old, PacketLength::Fixed(len)) if len < 65536 => 3,
            (PacketHeaderVersion::Old, PacketLength::Fixed(_)) => 5,
            (PacketHeaderVersion::Old, _) => 1,
        }
    }
}
