use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::checksum;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::Result;

/// A symmetric message key, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, derive_more::Debug)]
pub struct SessionKey {
    algorithm: SymmetricKeyAlgorithm,
    #[debug("..")]
    key: Vec<u8>,
}

impl SessionKey {
    pub fn new(algorithm: SymmetricKeyAlgorithm, key: &[u8]) -> Result<Self> {
        crate::ensure_packet!(
            key.len() == algorithm.key_size(),
            "{:?} needs a {} byte key, got {}",
            algorithm,
            algorithm.key_size(),
            key.len()
        );
        Ok(SessionKey {
            algorithm,
            key: key.to_vec(),
        })
    }

    pub fn algorithm(&self) -> SymmetricKeyAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// The value encrypted to a recipient: `algorithm || key || checksum`,
    /// where the checksum is the sum of the key bytes mod 65536, big endian.
    pub fn to_encryption_plaintext(&self) -> Zeroizing<Vec<u8>> {
        let mut data = Zeroizing::new(Vec::with_capacity(self.key.len() + 3));
        data.push(u8::from(self.algorithm));
        data.extend_from_slice(&self.key);
        data.extend_from_slice(&checksum::calculate_simple(&self.key).to_be_bytes());

        data
    }
}
