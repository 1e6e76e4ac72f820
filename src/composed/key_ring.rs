use std::iter;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::armor::{self, BlockType};
use crate::crypto::PublicKeyAlgorithm;
use crate::errors::{Error, ErrorKind, Result};
use crate::packet::{PacketParser, PublicKey, RawPacket, Signature, UserId};
use crate::types::{Fingerprint, KeyId, Tag};

/// A user id and the signatures following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUserId {
    pub id: UserId,
    pub signatures: Vec<Signature>,
}

/// A public subkey and its binding (or revocation) signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSubkeyEntry {
    pub key: PublicKey,
    pub signatures: Vec<Signature>,
}

/// A transferable public key, RFC 4880 section 11.1.
///
/// Signatures are kept but never verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRing {
    pub primary: PublicKey,
    /// Revocation and direct key signatures on the primary key.
    pub direct_signatures: Vec<Signature>,
    pub user_ids: Vec<SignedUserId>,
    pub subkeys: Vec<PublicSubkeyEntry>,
}

/// Where the next signature packet is attached to.
enum Owner {
    Primary,
    UserId,
    Subkey,
    /// A packet whose signatures are dropped, like a user attribute or a skipped subkey.
    Skipped,
}

impl PublicKeyRing {
    /// Parses an armored `PGP PUBLIC KEY BLOCK`.
    pub fn from_armor(input: &str) -> Result<Self> {
        let (typ, _headers, data) = armor::dearmor(input)?;
        if typ != BlockType::PublicKey {
            return Err(crate::armor_err!("expected {}, found {}", BlockType::PublicKey, typ));
        }

        Self::from_bytes(data)
    }

    /// Parses the binary packets of a transferable public key.
    pub fn from_bytes(input: Bytes) -> Result<Self> {
        let mut packets = PacketParser::new(input);

        let first = packets
            .next()
            .transpose()?
            .ok_or(Error::NotAPublicKeyRing { tag: None })?;
        let tag = first.header.tag();
        if tag != Tag::PublicKey {
            return Err(Error::NotAPublicKeyRing { tag: Some(tag) });
        }
        let primary = PublicKey::from_buf(tag, first.body)?;
        debug!(
            "primary key {} ({:?})",
            primary.key_id(),
            primary.algorithm()
        );

        let mut ring = PublicKeyRing {
            primary,
            direct_signatures: Vec::new(),
            user_ids: Vec::new(),
            subkeys: Vec::new(),
        };
        let mut owner = Owner::Primary;

        for packet in packets {
            let RawPacket { header, body } = packet?;
            match header.tag() {
                Tag::Signature => {
                    let sig = Signature::from_buf(body)?;
                    match owner {
                        Owner::Primary => ring.direct_signatures.push(sig),
                        Owner::UserId => {
                            if let Some(user) = ring.user_ids.last_mut() {
                                user.signatures.push(sig);
                            }
                        }
                        Owner::Subkey => {
                            if let Some(entry) = ring.subkeys.last_mut() {
                                entry.signatures.push(sig);
                            }
                        }
                        Owner::Skipped => {}
                    }
                }
                Tag::UserId => {
                    ring.user_ids.push(SignedUserId {
                        id: UserId::from_buf(body),
                        signatures: Vec::new(),
                    });
                    owner = Owner::UserId;
                }
                Tag::PublicSubkey => {
                    ring.check_last_binding();
                    owner = match PublicKey::from_buf(Tag::PublicSubkey, body) {
                        Ok(key) => {
                            debug!("subkey {} ({:?})", key.key_id(), key.algorithm());
                            ring.subkeys.push(PublicSubkeyEntry {
                                key,
                                signatures: Vec::new(),
                            });
                            Owner::Subkey
                        }
                        Err(err) if err.kind() == ErrorKind::UnsupportedAlgorithm => {
                            warn!("skipping subkey: {}", err);
                            Owner::Skipped
                        }
                        Err(err) => return Err(err),
                    };
                }
                Tag::UserAttribute => {
                    debug!("ignoring user attribute");
                    owner = Owner::Skipped;
                }
                Tag::Trust | Tag::Marker | Tag::Padding | Tag::Other(_) => {
                    debug!("ignoring {:?} packet", header.tag());
                }
                Tag::PublicKey => {
                    warn!("ignoring certificates following the first one");
                    break;
                }
                tag @ (Tag::SecretKey | Tag::SecretSubkey) => {
                    crate::bail_malformed!("unexpected {:?} packet in a public key block", tag);
                }
                tag => {
                    debug_assert!(tag.is_message_packet());
                    crate::bail_malformed!("unexpected {:?} packet in a public key block", tag);
                }
            }
        }
        ring.check_last_binding();

        Ok(ring)
    }

    fn check_last_binding(&self) {
        if let Some(entry) = self.subkeys.last() {
            if !entry.signatures.iter().any(Signature::is_subkey_signature) {
                warn!("subkey {} has no binding signature", entry.key.key_id());
            }
        }
    }

    /// All keys in order, the primary first.
    pub fn keys(&self) -> impl Iterator<Item = &PublicKey> {
        iter::once(&self.primary).chain(self.subkeys.iter().map(|entry| &entry.key))
    }

    /// Selects the key to encrypt to.
    ///
    /// This is the first key in ring order that supports encryption. A sign-only
    /// primary never qualifies, so its subkeys are considered in that case.
    pub fn encryption_key(&self) -> Result<&PublicKey> {
        let key = self
            .keys()
            .find(|key| key.is_encryption_key())
            .ok_or(Error::NoEncryptionKey)?;
        debug!(
            "selected {} {} ({:?})",
            if key.is_subkey() { "subkey" } else { "primary key" },
            key.key_id(),
            key.algorithm()
        );

        Ok(key)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.primary.fingerprint()
    }

    pub fn key_id(&self) -> KeyId {
        self.primary.key_id()
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        self.primary.created_at()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.primary.algorithm()
    }
}
