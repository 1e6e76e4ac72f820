use num_enum::{FromPrimitive, IntoPrimitive};

/// Compression algorithms, RFC 4880 section 9.3.
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[repr(u8)]
pub enum CompressionAlgorithm {
    Uncompressed = 0,
    /// Raw DEFLATE, RFC 1951.
    ZIP = 1,
    /// DEFLATE with zlib framing, RFC 1950.
    ZLIB = 2,
    BZip2 = 3,

    #[num_enum(catch_all)]
    #[cfg_attr(test, proptest(skip))]
    Other(u8),
}

#[allow(clippy::derivable_impls)]
impl Default for CompressionAlgorithm {
    fn default() -> Self {
        Self::ZIP
    }
}

impl CompressionAlgorithm {
    /// Whether payloads can be compressed and decompressed with this algorithm.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            CompressionAlgorithm::Uncompressed
                | CompressionAlgorithm::ZIP
                | CompressionAlgorithm::ZLIB
        )
    }
}
