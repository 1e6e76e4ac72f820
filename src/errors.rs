use snafu::Snafu;

use crate::types::Tag;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Coarse classification of an [`Error`], stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    ArmorMalformed,
    ArmorChecksumMismatch,
    PacketMalformed,
    NotAPublicKeyRing,
    NoEncryptionKey,
    UnsupportedAlgorithm,
    CryptoFailure,
    InputTooLarge,
    InvalidConfig,
    Io,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("malformed armor: {message}"))]
    ArmorMalformed { message: String },
    #[snafu(display("armor checksum mismatch: expected {expected:06X}, computed {actual:06X}"))]
    ArmorChecksumMismatch { expected: u32, actual: u32 },
    #[snafu(display("malformed packet: {message}"))]
    PacketMalformed { message: String },
    #[snafu(display("not a public key block, first packet: {tag:?}"))]
    NotAPublicKeyRing { tag: Option<Tag> },
    #[snafu(display("no encryption capable key found"))]
    NoEncryptionKey,
    #[snafu(display("unsupported: {message}"))]
    UnsupportedAlgorithm { message: String },
    #[snafu(display("crypto failure: {message}"))]
    CryptoFailure { message: String },
    #[snafu(display("input too large: {size} bytes, limit is {max}"))]
    InputTooLarge { size: usize, max: usize },
    #[snafu(display("invalid configuration: {message}"))]
    InvalidConfig { message: String },
    #[snafu(transparent)]
    Io { source: std::io::Error },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArmorMalformed { .. } => ErrorKind::ArmorMalformed,
            Self::ArmorChecksumMismatch { .. } => ErrorKind::ArmorChecksumMismatch,
            Self::PacketMalformed { .. } => ErrorKind::PacketMalformed,
            Self::NotAPublicKeyRing { .. } => ErrorKind::NotAPublicKeyRing,
            Self::NoEncryptionKey => ErrorKind::NoEncryptionKey,
            Self::UnsupportedAlgorithm { .. } => ErrorKind::UnsupportedAlgorithm,
            Self::CryptoFailure { .. } => ErrorKind::CryptoFailure,
            Self::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::ArmorMalformed {
            message: format!("invalid base64: {err}"),
        }
    }
}

impl From<rsa::Error> for Error {
    fn from(err: rsa::Error) -> Self {
        Error::CryptoFailure {
            message: format!("rsa: {err}"),
        }
    }
}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Self {
        Error::CryptoFailure {
            message: "invalid key or iv length".to_string(),
        }
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(err: std::num::TryFromIntError) -> Self {
        Error::PacketMalformed {
            message: format!("length out of range: {err}"),
        }
    }
}

impl From<elliptic_curve::Error> for Error {
    fn from(_: elliptic_curve::Error) -> Self {
        Error::CryptoFailure {
            message: "invalid elliptic curve point".to_string(),
        }
    }
}

#[macro_export]
macro_rules! malformed_err {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::errors::Error::PacketMalformed { message: format!($fmt $(, $arg)*) }
    };
}

#[macro_export]
macro_rules! bail_malformed {
    ($($arg:tt)+) => {
        return Err($crate::malformed_err!($($arg)+))
    };
}

#[macro_export]
macro_rules! ensure_packet {
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::bail_malformed!($($arg)+);
        }
    };
}

#[macro_export]
macro_rules! unsupported_err {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::errors::Error::UnsupportedAlgorithm { message: format!($fmt $(, $arg)*) })
    };
}

#[macro_export]
macro_rules! armor_err {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::errors::Error::ArmorMalformed { message: format!($fmt $(, $arg)*) }
    };
}
