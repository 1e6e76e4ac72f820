use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Bytes;
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use num_enum::{FromPrimitive, IntoPrimitive};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::packet::PacketTrait;
use crate::parsing::BufParsing;
use crate::ser::{time_to_u32, Serialize};
use crate::types::Tag;

/// File names are prefixed with a single length byte.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Literal Data Packet
/// <https://tools.ietf.org/html/rfc4880.html#section-5.9>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct LiteralData {
    mode: DataMode,
    #[debug("{:?}", String::from_utf8_lossy(file_name))]
    file_name: Bytes,
    created: DateTime<Utc>,
    #[debug("{} bytes", data.len())]
    data: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DataMode {
    Binary = b'b',
    Text = b't',
    Utf8 = b'u',
    /// Mime encoded, RFC 4880bis.
    Mime = b'm',

    #[num_enum(catch_all)]
    Other(u8),
}

#[allow(clippy::derivable_impls)]
impl Default for DataMode {
    fn default() -> Self {
        Self::Utf8
    }
}

impl LiteralData {
    /// Frames `data` with the given metadata.
    ///
    /// The payload is copied as is into a buffer that is wiped on drop,
    /// no line ending conversion happens in any mode.
    pub fn from_bytes(
        mode: DataMode,
        file_name: &[u8],
        created: DateTime<Utc>,
        data: &[u8],
    ) -> Result<Self> {
        if file_name.len() > MAX_FILE_NAME_LEN {
            return Err(Error::InputTooLarge {
                size: file_name.len(),
                max: MAX_FILE_NAME_LEN,
            });
        }
        // only whole seconds survive serialization
        let created = created.trunc_subsecs(0);
        time_to_u32(&created)?;

        Ok(LiteralData {
            mode,
            file_name: Bytes::copy_from_slice(file_name),
            created,
            data: Zeroizing::new(data.to_vec()),
        })
    }

    /// Parses a `LiteralData` packet body.
    pub fn from_buf(mut i: Bytes) -> Result<Self> {
        let mode = DataMode::from(i.read_u8()?);
        let name_len = i.read_u8()?;
        let file_name = i.read_take(name_len.into())?;
        let created = i.read_be_u32()?;
        let created = Utc
            .timestamp_opt(i64::from(created), 0)
            .single()
            .ok_or_else(|| crate::malformed_err!("invalid literal data time {}", created))?;
        let data = Zeroizing::new(i.rest().to_vec());

        Ok(LiteralData {
            mode,
            file_name,
            created,
            data,
        })
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn file_name(&self) -> &[u8] {
        &self.file_name
    }

    pub fn created(&self) -> &DateTime<Utc> {
        &self.created
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Serialize for LiteralData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.mode.into())?;
        // checked on construction, parsed names are at most 255 bytes anyway
        writer.write_u8(self.file_name.len() as u8)?;
        writer.write_all(&self.file_name)?;
        writer.write_u32::<BigEndian>(time_to_u32(&self.created)?)?;
        writer.write_all(&self.data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + 1 + self.file_name.len() + 4 + self.data.len()
    }
}

impl PacketTrait for LiteralData {
    fn tag(&self) -> Tag {
        Tag::LiteralData
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::ErrorKind;

    fn created() -> DateTime<Utc> {
        Utc.timestamp_opt(0x5F5E_1000, 0).single().unwrap()
    }

    #[test]
    fn test_layout() {
        let literal = LiteralData::from_bytes(
            DataMode::Utf8,
            b"payload.file",
            created(),
            b"hello\n",
        )
        .unwrap();

        let bytes = literal.to_bytes().unwrap();
        assert_eq!(bytes.len(), literal.write_len());
        assert_eq!(
            bytes,
            [
                &hex!("75 0c")[..],
                &b"payload.file"[..],
                &hex!("5F5E1000")[..],
                &b"hello\n"[..],
            ]
            .concat()
        );

        let parsed = LiteralData::from_buf(bytes.into()).unwrap();
        assert_eq!(parsed, literal);
    }

    #[test]
    fn test_payload_untouched() {
        let data = b"a\r\nb\nc\r";
        for mode in [DataMode::Utf8, DataMode::Text, DataMode::Binary] {
            let literal = LiteralData::from_bytes(mode, b"", created(), data).unwrap();
            let bytes = literal.to_bytes().unwrap();
            assert_eq!(bytes[0], u8::from(mode));
            assert_eq!(&bytes[6..], &data[..]);
        }
    }

    #[test]
    fn test_subsecond_time() {
        let t = Utc.timestamp_opt(10, 999_000_000).single().unwrap();
        let literal = LiteralData::from_bytes(DataMode::Binary, b"x", t, &[]).unwrap();
        let parsed = LiteralData::from_buf(literal.to_bytes().unwrap().into()).unwrap();
        assert_eq!(parsed.created().timestamp(), 10);
        assert_eq!(parsed, literal);
    }

    #[test]
    fn test_file_name_limit() {
        let name = vec![b'a'; MAX_FILE_NAME_LEN];
        assert!(LiteralData::from_bytes(DataMode::Utf8, &name, created(), &[]).is_ok());

        let name = vec![b'a'; MAX_FILE_NAME_LEN + 1];
        let err =
            LiteralData::from_bytes(DataMode::Utf8, &name, created(), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputTooLarge);
    }

    #[test]
    fn test_payload_wiped_on_drop() {
        fn assert_zeroizing<T: zeroize::Zeroize>(_: &Zeroizing<T>) {}

        let literal =
            LiteralData::from_bytes(DataMode::Binary, b"", created(), b"secret").unwrap();
        assert_zeroizing(&literal.data);
        let parsed = LiteralData::from_buf(literal.to_bytes().unwrap().into()).unwrap();
        assert_zeroizing(&parsed.data);
    }

    #[test]
    fn test_truncated() {
        let err = LiteralData::from_buf(Bytes::from_static(&hex!("62 05 6162"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PacketMalformed);
    }
}
