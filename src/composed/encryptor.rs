use chrono::Utc;
use log::debug;
use rand::{thread_rng, CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::armor::{self, BlockType};
use crate::composed::{EncryptConfig, PublicKeyRing};
use crate::crypto::SymmetricKeyAlgorithm;
use crate::errors::Result;
use crate::packet::{
    write_packet, write_packet_partial, CompressedData, LiteralData, PacketTrait, PublicKey,
    PublicKeyEncryptedSessionKey, SymEncryptedProtectedData,
};
use crate::ser::Serialize;
use crate::types::{SessionKey, Tag};

/// Symmetric algorithm of every produced message.
pub const SESSION_KEY_ALGORITHM: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

/// Encrypts messages to the encryption key of one public key ring.
///
/// Holds no per message state, so it can be shared and reused. Every call to
/// [`Encryptor::encrypt`] uses a fresh session key.
///
/// ```rust,no_run
/// use pgpenc::composed::Encryptor;
///
/// # fn run(key_block: &str) -> pgpenc::errors::Result<()> {
/// let encryptor = Encryptor::new(key_block)?;
/// let message = encryptor.encrypt(b"hello world")?;
/// assert!(message.starts_with("-----BEGIN PGP MESSAGE-----"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Encryptor {
    ring: PublicKeyRing,
    recipient: PublicKey,
    config: EncryptConfig,
}

impl Encryptor {
    /// Parses an armored public key block and selects its encryption key.
    pub fn new(public_key_block: &str) -> Result<Self> {
        Self::from_key_ring(PublicKeyRing::from_armor(public_key_block)?)
    }

    pub fn from_key_ring(ring: PublicKeyRing) -> Result<Self> {
        let recipient = ring.encryption_key()?.clone();

        Ok(Encryptor {
            ring,
            recipient,
            config: EncryptConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EncryptConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The key session keys are encrypted to.
    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }

    pub fn key_ring(&self) -> &PublicKeyRing {
        &self.ring
    }

    pub fn config(&self) -> &EncryptConfig {
        &self.config
    }

    /// Encrypts `plaintext` into an armored `PGP MESSAGE`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        self.encrypt_with_rng(thread_rng(), plaintext)
    }

    pub fn encrypt_with_rng<R: CryptoRng + Rng>(&self, rng: R, plaintext: &[u8]) -> Result<String> {
        let message = self.encrypt_to_bytes_with_rng(rng, plaintext)?;
        armor::armor(
            BlockType::Message,
            Some(self.config.get_armor_headers()),
            &message,
        )
    }

    /// Same as [`Encryptor::encrypt_with_rng`], but returns the binary packets.
    pub fn encrypt_to_bytes_with_rng<R: CryptoRng + Rng>(
        &self,
        rng: R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        EncryptionContext::new(rng, &self.recipient, &self.config)?.run(plaintext)
    }
}

/// State of encrypting a single message.
///
/// Consumed by [`EncryptionContext::run`], the session key is wiped on drop.
struct EncryptionContext<'a, R> {
    rng: R,
    recipient: &'a PublicKey,
    config: &'a EncryptConfig,
    session_key: SessionKey,
    out: Vec<u8>,
}

impl<'a, R: CryptoRng + Rng> EncryptionContext<'a, R> {
    fn new(mut rng: R, recipient: &'a PublicKey, config: &'a EncryptConfig) -> Result<Self> {
        let session_key = SESSION_KEY_ALGORITHM.new_session_key(&mut rng)?;

        Ok(EncryptionContext {
            rng,
            recipient,
            config,
            session_key,
            out: Vec::new(),
        })
    }

    fn run(mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        // 1. session key, encrypted to the recipient
        let esk = PublicKeyEncryptedSessionKey::from_session_key(
            &mut self.rng,
            &self.session_key,
            self.recipient,
        )?;
        esk.to_writer_with_header(&mut self.out)?;
        debug!("wrote PKESK for {}", self.recipient.key_id());

        // 2. literal data
        let created = self.config.get_created().copied().unwrap_or_else(Utc::now);
        let literal = LiteralData::from_bytes(
            self.config.get_data_mode(),
            self.config.get_file_name(),
            created,
            plaintext,
        )?;
        let mut literal_packet = Zeroizing::new(Vec::with_capacity(literal.write_len() + 6));
        literal.to_writer_with_header(&mut *literal_packet)?;
        drop(literal);

        // 3. compression
        let compressed =
            CompressedData::from_raw(self.config.get_compression(), &literal_packet)?;
        let compressed_packet = self.framed(Tag::CompressedData, &compressed)?;
        drop(compressed);
        drop(literal_packet);

        // 4. integrity protected encryption
        let seip = SymEncryptedProtectedData::encrypt_with_rng(
            &mut self.rng,
            &self.session_key,
            &compressed_packet,
        )?;
        let seip_packet = self.framed(Tag::SymEncryptedProtectedData, &seip)?;
        self.out.extend_from_slice(&seip_packet);
        debug!(
            "encrypted {} bytes into a {} byte message",
            plaintext.len(),
            self.out.len()
        );

        Ok(self.out)
    }

    /// Serializes a packet, with partial lengths if a chunk size is configured.
    fn framed(&self, tag: Tag, packet: &impl PacketTrait) -> Result<Zeroizing<Vec<u8>>> {
        let body = Zeroizing::new(packet.to_bytes()?);
        let chunk_size = self.config.get_chunk_size();
        let mut buf = Zeroizing::new(Vec::with_capacity(framed_len(body.len(), chunk_size)));
        match chunk_size {
            Some(chunk_size) => write_packet_partial(&mut *buf, tag, &body, chunk_size)?,
            None => write_packet(&mut *buf, tag, &body)?,
        }
        Ok(buf)
    }
}

/// Upper bound of a framed packet with a body of `body_len` bytes.
///
/// One tag byte, one length byte per full partial chunk and at most five bytes
/// for the final fixed length.
fn framed_len(body_len: usize, chunk_size: Option<u32>) -> usize {
    let partial_headers = match chunk_size {
        Some(chunk_size) => body_len / chunk_size as usize,
        None => 0,
    };
    body_len + partial_headers + 6
}
