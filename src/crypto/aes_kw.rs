use aes::cipher::generic_array::GenericArray;
use ::aes_kw::{KekAes128, KekAes192, KekAes256};
use snafu::Snafu;
use zeroize::Zeroizing;

/// Length of the integrity check register prepended by the wrap.
const IV_LEN: usize = 8;

/// AES key wrap possible errors.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid key size: {}", size))]
    InvalidKeySize { size: usize },
    #[snafu(display("wrap failed: {}", message))]
    Wrap { message: String },
    #[snafu(display("unwrap failed: {}", message))]
    Unwrap { message: String },
}

impl From<Error> for crate::errors::Error {
    fn from(err: Error) -> Self {
        crate::errors::Error::CryptoFailure {
            message: err.to_string(),
        }
    }
}

/// AES Key Wrap
/// As defined in RFC 3394.
pub fn wrap(key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; data.len() + IV_LEN];
    let res = match key.len() {
        16 => KekAes128::new(GenericArray::from_slice(key)).wrap(data, &mut buf),
        24 => KekAes192::new(GenericArray::from_slice(key)).wrap(data, &mut buf),
        32 => KekAes256::new(GenericArray::from_slice(key)).wrap(data, &mut buf),
        _ => return InvalidKeySizeSnafu { size: key.len() * 8 }.fail(),
    };
    res.map_err(|e| Error::Wrap {
        message: e.to_string(),
    })?;

    Ok(buf)
}

/// AES Key Unwrap
/// As defined in RFC 3394.
pub fn unwrap(key: &[u8], data: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    if data.len() < IV_LEN {
        return UnwrapSnafu {
            message: format!("{} bytes is too short", data.len()),
        }
        .fail();
    }
    let mut buf = Zeroizing::new(vec![0u8; data.len() - IV_LEN]);
    let res = match key.len() {
        16 => KekAes128::new(GenericArray::from_slice(key)).unwrap(data, &mut buf),
        24 => KekAes192::new(GenericArray::from_slice(key)).unwrap(data, &mut buf),
        32 => KekAes256::new(GenericArray::from_slice(key)).unwrap(data, &mut buf),
        _ => return InvalidKeySizeSnafu { size: key.len() * 8 }.fail(),
    };
    res.map_err(|e| Error::Unwrap {
        message: e.to_string(),
    })?;

    Ok(buf)
}
