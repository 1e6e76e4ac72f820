use std::fmt;

use bytes::Buf;

use crate::errors::Result;
use crate::parsing::BufParsing;

/// The 8 byte identifier of a key, the low 64 bits of its v4 fingerprint.
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug)]
#[debug("KeyId({})", hex::encode(_0))]
pub struct KeyId([u8; 8]);

impl KeyId {
    pub fn from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        Ok(KeyId(i.read_array::<8>()?))
    }
}

impl From<[u8; 8]> for KeyId {
    fn from(value: [u8; 8]) -> Self {
        KeyId(value)
    }
}

impl AsRef<[u8]> for KeyId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}
