use std::io;

use bytes::Bytes;

use crate::errors::Result;
use crate::packet::PacketTrait;
use crate::ser::Serialize;
use crate::types::Tag;

/// User ID Packet
/// <https://tools.ietf.org/html/rfc4880.html#section-5.11>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
#[debug("UserId({:?})", String::from_utf8_lossy(_0))]
pub struct UserId(Bytes);

impl UserId {
    pub fn from_buf(body: Bytes) -> Self {
        UserId(body)
    }

    /// The id as text. Invalid UTF-8 is replaced, the raw bytes stay available via `AsRef`.
    pub fn id(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(Bytes::copy_from_slice(id.as_bytes()))
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for UserId {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.0)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.0.len()
    }
}

impl PacketTrait for UserId {
    fn tag(&self) -> Tag {
        Tag::UserId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_id() {
        let id = UserId::from_buf(Bytes::from_static(b"Me \xff<me@mail.com>"));
        assert_eq!(id.id(), "Me \u{fffd}<me@mail.com>");
        assert_eq!(id.as_ref().len(), 17);

        let id = UserId::from("Alice <alice@example.org>");
        assert_eq!(id.to_bytes().unwrap(), b"Alice <alice@example.org>".to_vec());
        assert_eq!(format!("{id:?}"), "UserId(\"Alice <alice@example.org>\")");
    }
}
