use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use rand::{CryptoRng, Rng};

use crate::crypto::{ecdh, public_key::PublicKeyAlgorithm, rsa};
use crate::errors::Result;
use crate::packet::PacketTrait;
use crate::parsing::BufParsing;
use crate::ser::{time_to_u32, Serialize};
use crate::types::{Fingerprint, KeyId, KeyVersion, PkeskBytes, PublicParams, Tag};

/// A v4 public key or subkey packet, RFC 4880 section 5.5.2.
///
/// The packet body is kept as received, so fingerprints are computed over the exact bytes.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct PublicKey {
    #[debug(skip)]
    tag: Tag,
    algorithm: PublicKeyAlgorithm,
    created_at: DateTime<Utc>,
    params: PublicParams,
    fingerprint: Fingerprint,
    #[debug(skip)]
    body: Bytes,
}

impl PublicKey {
    /// Parses a public key or public subkey packet body.
    pub fn from_buf(tag: Tag, body: Bytes) -> Result<Self> {
        crate::ensure_packet!(
            matches!(tag, Tag::PublicKey | Tag::PublicSubkey),
            "{:?} is not a public key packet",
            tag
        );

        let mut i = body.clone();
        let version = KeyVersion::from(i.read_u8()?);
        if version != KeyVersion::V4 {
            crate::unsupported_err!("key version {:?}", version);
        }

        let created = i.read_be_u32()?;
        let created_at = Utc
            .timestamp_opt(i64::from(created), 0)
            .single()
            .ok_or_else(|| crate::malformed_err!("invalid creation time {}", created))?;
        let algorithm = PublicKeyAlgorithm::from(i.read_u8()?);
        let params = PublicParams::try_from_buf(algorithm, &mut i)?;
        i.ensure_empty("public key")?;

        let fingerprint = Fingerprint::from_key_body(&body)?;

        Ok(PublicKey {
            tag,
            algorithm,
            created_at,
            params,
            fingerprint,
            body,
        })
    }

    /// Builds a v4 key from its parts. `tag` picks primary key or subkey.
    pub fn from_params(
        tag: Tag,
        created_at: DateTime<Utc>,
        algorithm: PublicKeyAlgorithm,
        params: PublicParams,
    ) -> Result<Self> {
        let mut body = Vec::with_capacity(6 + params.write_len());
        body.write_u8(KeyVersion::V4.into())?;
        body.write_u32::<BigEndian>(time_to_u32(&created_at)?)?;
        body.write_u8(algorithm.into())?;
        params.to_writer(&mut body)?;

        Self::from_buf(tag, body.into())
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.params
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint.key_id()
    }

    pub fn is_subkey(&self) -> bool {
        self.tag == Tag::PublicSubkey
    }

    /// Whether session keys can be encrypted to this key.
    pub fn is_encryption_key(&self) -> bool {
        self.algorithm.can_encrypt()
    }

    /// Encrypts `plain`, usually a prepared session key, to this key.
    pub fn encrypt<R: CryptoRng + Rng>(&self, rng: R, plain: &[u8]) -> Result<PkeskBytes> {
        match (self.algorithm, &self.params) {
            (
                PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt,
                PublicParams::RSA(params),
            ) => rsa::encrypt(rng, &params.key, plain),
            (PublicKeyAlgorithm::ECDH, PublicParams::ECDH(params)) => {
                ecdh::encrypt(rng, params, self.fingerprint.as_ref(), plain)
            }
            (alg, _) => crate::unsupported_err!("encryption to {:?} keys", alg),
        }
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.body)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.body.len()
    }
}

impl PacketTrait for PublicKey {
    fn tag(&self) -> Tag {
        self.tag
    }
}
