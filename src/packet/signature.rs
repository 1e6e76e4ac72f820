use std::io;

use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::crypto::{HashAlgorithm, PublicKeyAlgorithm};
use crate::errors::Result;
use crate::packet::PacketTrait;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Tag;

/// Signature Packet
/// <https://tools.ietf.org/html/rfc4880.html#section-5.2>
///
/// Signatures are carried, not verified. Only the leading fields of v3 and v4
/// signatures are decoded, the packet body is kept as is.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Signature {
    version: u8,
    typ: SignatureType,
    pub_alg: Option<PublicKeyAlgorithm>,
    hash_alg: Option<HashAlgorithm>,
    #[debug("{} bytes", body.len())]
    body: Bytes,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SignatureType {
    Binary = 0x00,
    Text = 0x01,
    Standalone = 0x02,
    CertGeneric = 0x10,
    CertPersona = 0x11,
    CertCasual = 0x12,
    CertPositive = 0x13,
    /// Binds a subkey to its primary key.
    SubkeyBinding = 0x18,
    /// Back signature of a signing subkey.
    KeyBinding = 0x19,
    Key = 0x1F,
    KeyRevocation = 0x20,
    SubkeyRevocation = 0x28,
    CertRevocation = 0x30,
    Timestamp = 0x40,
    ThirdParty = 0x50,

    #[num_enum(catch_all)]
    Other(u8),
}

impl Signature {
    /// Parses a `Signature` packet body.
    pub fn from_buf(body: Bytes) -> Result<Self> {
        let mut i = body.clone();
        let version = i.read_u8()?;
        let (typ, pub_alg, hash_alg) = match version {
            2 | 3 => {
                let hashed_len = i.read_u8()?;
                crate::ensure_packet!(
                    hashed_len == 5,
                    "invalid v3 signature hashed length {}",
                    hashed_len
                );
                let typ = SignatureType::from(i.read_u8()?);
                // creation time and issuer
                i.ensure_remaining("v3 signature", 4 + 8 + 2)?;
                i.read_take(4 + 8)?;
                let pub_alg = PublicKeyAlgorithm::from(i.read_u8()?);
                let hash_alg = HashAlgorithm::from(i.read_u8()?);
                (typ, Some(pub_alg), Some(hash_alg))
            }
            4 | 5 | 6 => {
                let typ = SignatureType::from(i.read_u8()?);
                let pub_alg = PublicKeyAlgorithm::from(i.read_u8()?);
                let hash_alg = HashAlgorithm::from(i.read_u8()?);
                (typ, Some(pub_alg), Some(hash_alg))
            }
            _ => (SignatureType::Other(0xFF), None, None),
        };

        Ok(Signature {
            version,
            typ,
            pub_alg,
            hash_alg,
            body,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// The signature type, `Other(0xFF)` for unknown signature versions.
    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    pub fn pub_alg(&self) -> Option<PublicKeyAlgorithm> {
        self.pub_alg
    }

    pub fn hash_alg(&self) -> Option<HashAlgorithm> {
        self.hash_alg
    }

    /// Whether this signature binds or revokes a subkey.
    pub fn is_subkey_signature(&self) -> bool {
        matches!(
            self.typ,
            SignatureType::SubkeyBinding | SignatureType::SubkeyRevocation
        )
    }
}

impl Serialize for Signature {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.body)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.body.len()
    }
}

impl PacketTrait for Signature {
    fn tag(&self) -> Tag {
        Tag::Signature
    }
}
