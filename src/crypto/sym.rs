use aes::{Aes128, Aes192, Aes256};
use cfb_mode::{
    cipher::{AsyncStreamCipher, KeyIvInit},
    Encryptor,
};
use cipher::{BlockCipher, BlockEncryptMut};
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};
use rand::{CryptoRng, Rng};
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::types::SessionKey;

/// Header of the modification detection code packet: new format tag 19, length 20.
pub const MDC_HEADER: [u8; 2] = [0xD3, 0x14];

/// Length of the trailing modification detection code packet.
pub const MDC_LEN: usize = 22;

/// Available symmetric key algorithms, RFC 4880 section 9.2.
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum SymmetricKeyAlgorithm {
    Plaintext = 0,
    IDEA = 1,
    TripleDES = 2,
    CAST5 = 3,
    Blowfish = 4,
    AES128 = 7,
    AES192 = 8,
    AES256 = 9,
    Twofish = 10,
    Camellia128 = 11,
    Camellia192 = 12,
    Camellia256 = 13,

    #[num_enum(catch_all)]
    #[cfg_attr(test, proptest(skip))]
    Other(u8),
}

#[allow(clippy::derivable_impls)]
impl Default for SymmetricKeyAlgorithm {
    fn default() -> Self {
        Self::AES256
    }
}

impl zeroize::DefaultIsZeroes for SymmetricKeyAlgorithm {}

fn encrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher,
    Encryptor<C>: KeyIvInit,
{
    Encryptor::<C>::new_from_slices(key, iv)?.encrypt(data);
    Ok(())
}

impl SymmetricKeyAlgorithm {
    pub fn block_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::IDEA
            | SymmetricKeyAlgorithm::TripleDES
            | SymmetricKeyAlgorithm::CAST5
            | SymmetricKeyAlgorithm::Blowfish => 8,
            SymmetricKeyAlgorithm::AES128
            | SymmetricKeyAlgorithm::AES192
            | SymmetricKeyAlgorithm::AES256
            | SymmetricKeyAlgorithm::Twofish
            | SymmetricKeyAlgorithm::Camellia128
            | SymmetricKeyAlgorithm::Camellia192
            | SymmetricKeyAlgorithm::Camellia256 => 16,
            SymmetricKeyAlgorithm::Plaintext | SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    pub const fn key_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::IDEA
            | SymmetricKeyAlgorithm::CAST5
            | SymmetricKeyAlgorithm::Blowfish
            | SymmetricKeyAlgorithm::AES128
            | SymmetricKeyAlgorithm::Camellia128 => 16,
            SymmetricKeyAlgorithm::TripleDES
            | SymmetricKeyAlgorithm::AES192
            | SymmetricKeyAlgorithm::Camellia192 => 24,
            SymmetricKeyAlgorithm::AES256
            | SymmetricKeyAlgorithm::Twofish
            | SymmetricKeyAlgorithm::Camellia256 => 32,
            SymmetricKeyAlgorithm::Plaintext | SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    /// Whether this crate can encrypt with the algorithm.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            SymmetricKeyAlgorithm::AES128
                | SymmetricKeyAlgorithm::AES192
                | SymmetricKeyAlgorithm::AES256
        )
    }

    /// Generates a fresh random session key for this algorithm.
    pub fn new_session_key<R: CryptoRng + Rng>(self, mut rng: R) -> Result<SessionKey> {
        if !self.is_supported() {
            crate::unsupported_err!("symmetric algorithm {:?}", self);
        }
        let mut key = Zeroizing::new(vec![0u8; self.key_size()]);
        rng.fill_bytes(&mut key);

        SessionKey::new(self, &key)
    }

    /// Encrypts `plaintext` in the integrity protected format of RFC 4880 section 5.13.
    ///
    /// The output is `prefix || plaintext || 0xD3 0x14 || SHA1(...)` encrypted with
    /// CFB over the whole buffer, a zero IV and no resynchronization.
    pub fn encrypt_protected<R: CryptoRng + Rng>(
        self,
        mut rng: R,
        key: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        debug!("protected encrypt {:?}, {} bytes", self, plaintext.len());
        if !self.is_supported() {
            crate::unsupported_err!("symmetric algorithm {:?}", self);
        }

        let bs = self.block_size();
        let prefix_len = bs + 2;
        let data_end = prefix_len + plaintext.len();

        // sized up front so the buffer holding plaintext is never reallocated
        let mut buf = Zeroizing::new(vec![0u8; data_end + MDC_LEN]);

        rng.fill_bytes(&mut buf[..bs]);
        buf[bs] = buf[bs - 2];
        buf[bs + 1] = buf[bs - 1];

        buf[prefix_len..data_end].copy_from_slice(plaintext);
        buf[data_end..data_end + 2].copy_from_slice(&MDC_HEADER);

        let checksum = Sha1::digest(&buf[..data_end + 2]);
        buf[data_end + 2..].copy_from_slice(&checksum);

        let iv = vec![0u8; bs];
        self.encrypt_with_iv(key, &iv, &mut buf)?;

        // the buffer now only holds ciphertext
        Ok(std::mem::take(&mut *buf))
    }

    /// Plain CFB encryption of `data` in place.
    pub fn encrypt_with_iv(self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
        match self {
            SymmetricKeyAlgorithm::AES128 => encrypt::<Aes128>(key, iv, data),
            SymmetricKeyAlgorithm::AES192 => encrypt::<Aes192>(key, iv, data),
            SymmetricKeyAlgorithm::AES256 => encrypt::<Aes256>(key, iv, data),
            _ => crate::unsupported_err!("symmetric algorithm {:?}", self),
        }
    }
}
