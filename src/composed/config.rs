use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::armor::Headers;
use crate::errors::{Error, Result};
use crate::packet::{DataMode, MAX_FILE_NAME_LEN, MIN_PARTIAL_CHUNK};
use crate::types::{CompressionAlgorithm, MAX_PARTIAL_LEN};

/// File name written into the literal data packet unless configured otherwise.
pub const DEFAULT_FILE_NAME: &str = "payload.file";

/// Message framing options.
///
/// The defaults produce a fully buffered `PKESK || SEIP(ZIP(literal))` message with
/// mode `u`, file name [`DEFAULT_FILE_NAME`], the current time and no armor headers.
///
/// ```rust
/// use pgpenc::composed::EncryptConfig;
/// use pgpenc::types::CompressionAlgorithm;
///
/// let config = EncryptConfig::default()
///     .compression(CompressionAlgorithm::ZLIB)
///     .chunk_size(4096)
///     .unwrap()
///     .armor_header("Comment", "sent with pgpenc")
///     .unwrap();
/// assert_eq!(config.get_chunk_size(), Some(4096));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptConfig {
    file_name: Bytes,
    data_mode: DataMode,
    compression: CompressionAlgorithm,
    /// `None` means the time of encryption.
    created: Option<DateTime<Utc>>,
    /// The chunk size when generating partial packets
    chunk_size: Option<u32>,
    armor_headers: Headers,
}

impl Default for EncryptConfig {
    fn default() -> Self {
        EncryptConfig {
            file_name: Bytes::from_static(DEFAULT_FILE_NAME.as_bytes()),
            data_mode: DataMode::Utf8,
            compression: CompressionAlgorithm::ZIP,
            created: None,
            chunk_size: None,
            armor_headers: Headers::new(),
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}

impl EncryptConfig {
    pub fn file_name(mut self, name: impl Into<Bytes>) -> Result<Self> {
        let name = name.into();
        if name.len() > MAX_FILE_NAME_LEN {
            return Err(Error::InputTooLarge {
                size: name.len(),
                max: MAX_FILE_NAME_LEN,
            });
        }
        self.file_name = name;
        Ok(self)
    }

    pub fn data_mode(mut self, mode: DataMode) -> Self {
        self.data_mode = mode;
        self
    }

    /// Only uncompressed, ZIP and ZLIB can be produced.
    pub fn compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Fixes the literal data timestamp instead of using the time of encryption.
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Emit the compressed and encrypted packets with partial body lengths of `size`.
    pub fn chunk_size(mut self, size: u32) -> Result<Self> {
        if size < MIN_PARTIAL_CHUNK {
            return Err(invalid(format!(
                "chunk size must be at least {MIN_PARTIAL_CHUNK}, got {size}"
            )));
        }
        if !size.is_power_of_two() || size > MAX_PARTIAL_LEN {
            return Err(invalid(format!(
                "chunk size must be a power of two up to {MAX_PARTIAL_LEN}, got {size}"
            )));
        }
        self.chunk_size = Some(size);
        Ok(self)
    }

    /// Adds a `key: value` line to the armor headers of the output.
    pub fn armor_header(mut self, key: &str, value: &str) -> Result<Self> {
        if key.is_empty() || key.contains([':', '\r', '\n']) || key.trim() != key {
            return Err(invalid(format!("invalid armor header key {key:?}")));
        }
        if value.contains(['\r', '\n']) {
            return Err(invalid(format!("invalid armor header value {value:?}")));
        }
        self.armor_headers
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(self)
    }

    /// Checks settings that can not be rejected by the setters.
    pub fn validate(&self) -> Result<()> {
        if !self.compression.is_supported() {
            return Err(invalid(format!(
                "compression {:?} is not supported",
                self.compression
            )));
        }
        Ok(())
    }

    pub fn get_file_name(&self) -> &[u8] {
        &self.file_name
    }

    pub fn get_data_mode(&self) -> DataMode {
        self.data_mode
    }

    pub fn get_compression(&self) -> CompressionAlgorithm {
        self.compression
    }

    pub fn get_created(&self) -> Option<&DateTime<Utc>> {
        self.created.as_ref()
    }

    pub fn get_chunk_size(&self) -> Option<u32> {
        self.chunk_size
    }

    pub fn get_armor_headers(&self) -> &Headers {
        &self.armor_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = EncryptConfig::default();
        assert_eq!(config.get_file_name(), b"payload.file");
        assert_eq!(config.get_data_mode(), DataMode::Utf8);
        assert_eq!(config.get_compression(), CompressionAlgorithm::ZIP);
        assert!(config.get_created().is_none());
        assert!(config.get_chunk_size().is_none());
        assert!(config.get_armor_headers().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_size() {
        for size in [512, 1024, 1 << 30] {
            assert!(EncryptConfig::default().chunk_size(size).is_ok());
        }
        for size in [0, 256, 511, 1000, 1 << 31] {
            let err = EncryptConfig::default().chunk_size(size).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "size {size}");
        }
    }

    #[test]
    fn test_file_name() {
        let config = EncryptConfig::default().file_name("notes.txt").unwrap();
        assert_eq!(config.get_file_name(), b"notes.txt");

        let err = EncryptConfig::default()
            .file_name(vec![b'x'; 256])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputTooLarge);
    }

    #[test]
    fn test_armor_headers() {
        let config = EncryptConfig::default()
            .armor_header("Comment", "a")
            .unwrap()
            .armor_header("Comment", "b")
            .unwrap();
        assert_eq!(
            config.get_armor_headers()["Comment"],
            vec!["a".to_string(), "b".to_string()]
        );

        for (key, value) in [("", "x"), ("A:B", "x"), (" A", "x"), ("A", "x\ny")] {
            let err = EncryptConfig::default()
                .armor_header(key, value)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        }
    }

    #[test]
    fn test_unsupported_compression() {
        let config = EncryptConfig::default().compression(CompressionAlgorithm::BZip2);
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);
    }
}
