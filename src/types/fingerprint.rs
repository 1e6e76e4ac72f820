use std::fmt;

use sha1::{Digest, Sha1};

use crate::errors::Result;
use crate::types::KeyId;

/// A v4 key fingerprint.
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug)]
#[debug("Fingerprint({})", hex::encode(_0))]
pub struct Fingerprint([u8; 20]);

impl Fingerprint {
    /// Computes the fingerprint over a serialized v4 key packet body.
    ///
    /// The body is hashed as if it were an old format public key packet with a two byte length.
    pub fn from_key_body(body: &[u8]) -> Result<Self> {
        let len = u16::try_from(body.len())
            .map_err(|_| crate::malformed_err!("key body of {} bytes", body.len()))?;

        let mut h = Sha1::new();
        h.update([0x99]);
        h.update(len.to_be_bytes());
        h.update(body);

        let mut fp = [0u8; 20];
        fp.copy_from_slice(&h.finalize());
        Ok(Fingerprint(fp))
    }

    /// The low 64 bits.
    pub fn key_id(&self) -> KeyId {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[12..]);
        KeyId::from(id)
    }
}

impl From<[u8; 20]> for Fingerprint {
    fn from(value: [u8; 20]) -> Self {
        Fingerprint(value)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}
