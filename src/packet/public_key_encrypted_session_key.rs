use std::io;

use byteorder::WriteBytesExt;
use bytes::Bytes;
use log::debug;
use rand::{CryptoRng, Rng};

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::packet::{PacketTrait, PublicKey};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{KeyId, PkeskBytes, SessionKey, Tag};

/// Public Key Encrypted Session Key Packet (PKESK)
/// <https://tools.ietf.org/html/rfc4880.html#section-5.1>
///
/// Only version 3 is written. Other versions are kept opaque when reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyEncryptedSessionKey {
    V3 {
        id: KeyId,
        pk_algo: PublicKeyAlgorithm,
        values: PkeskBytes,
    },
    Other {
        version: u8,
        data: Bytes,
    },
}

impl PublicKeyEncryptedSessionKey {
    /// Encrypts the given session key to `pkey`.
    pub fn from_session_key<R: CryptoRng + Rng>(
        rng: R,
        session_key: &SessionKey,
        pkey: &PublicKey,
    ) -> Result<Self> {
        // algorithm, key and checksum
        let data = session_key.to_encryption_plaintext();
        let values = pkey.encrypt(rng, &data)?;
        debug!(
            "session key encrypted to {} ({:?})",
            pkey.key_id(),
            pkey.algorithm()
        );

        Ok(PublicKeyEncryptedSessionKey::V3 {
            id: pkey.key_id(),
            pk_algo: pkey.algorithm(),
            values,
        })
    }

    /// Parses a `PublicKeyEncryptedSessionKey` packet body.
    pub fn from_buf(mut i: Bytes) -> Result<Self> {
        let version = i.read_u8()?;
        if version != 3 {
            return Ok(PublicKeyEncryptedSessionKey::Other {
                version,
                data: i.rest(),
            });
        }

        let id = KeyId::from_buf(&mut i)?;
        let pk_algo = PublicKeyAlgorithm::from(i.read_u8()?);
        let values = PkeskBytes::from_buf(pk_algo, &mut i)?;
        i.ensure_empty("public key encrypted session key")?;

        Ok(PublicKeyEncryptedSessionKey::V3 {
            id,
            pk_algo,
            values,
        })
    }

    /// The recipient key id, `None` for unknown versions.
    pub fn id(&self) -> Option<&KeyId> {
        match self {
            Self::V3 { id, .. } => Some(id),
            Self::Other { .. } => None,
        }
    }

    pub fn algorithm(&self) -> Option<PublicKeyAlgorithm> {
        match self {
            Self::V3 { pk_algo, .. } => Some(*pk_algo),
            Self::Other { .. } => None,
        }
    }

    pub fn values(&self) -> Option<&PkeskBytes> {
        match self {
            Self::V3 { values, .. } => Some(values),
            Self::Other { .. } => None,
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            Self::V3 { .. } => 3,
            Self::Other { version, .. } => *version,
        }
    }
}

impl Serialize for PublicKeyEncryptedSessionKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::V3 {
                id,
                pk_algo,
                values,
            } => {
                writer.write_u8(3)?;
                writer.write_all(id.as_ref())?;
                writer.write_u8((*pk_algo).into())?;
                values.to_writer(writer)?;
            }
            Self::Other { version, .. } => {
                crate::unsupported_err!("writing PKESK version {}", version)
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            Self::V3 { values, .. } => 1 + 8 + 1 + values.write_len(),
            Self::Other { data, .. } => 1 + data.len(),
        }
    }
}

impl PacketTrait for PublicKeyEncryptedSessionKey {
    fn tag(&self) -> Tag {
        Tag::PublicKeyEncryptedSessionKey
    }
}
