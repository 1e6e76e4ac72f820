use log::debug;
use rand::{CryptoRng, Rng};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::errors::Result;
use crate::types::{Mpi, PkeskBytes};

/// RSA encryption with EME-PKCS1-v1_5 padding, RFC 4880 section 13.1.
pub fn encrypt<R: CryptoRng + Rng>(
    mut rng: R,
    key: &RsaPublicKey,
    plaintext: &[u8],
) -> Result<PkeskBytes> {
    debug!("RSA encrypt to a {} bit key", key.n().bits());
    let data = key.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)?;

    Ok(PkeskBytes::Rsa {
        mpi: Mpi::from_slice(&data[..]),
    })
}
