use std::io::{self, Read, Write};

use byteorder::WriteBytesExt;
use bytes::Bytes;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use log::debug;
use zeroize::Zeroizing;

use crate::errors::Result;
use crate::packet::PacketTrait;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{CompressionAlgorithm, Tag};

/// Compressed Data Packet
/// <https://tools.ietf.org/html/rfc4880.html#section-5.6>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct CompressedData {
    compression_algorithm: CompressionAlgorithm,
    #[debug("{} bytes", compressed_data.len())]
    compressed_data: Zeroizing<Vec<u8>>,
}

/// Upper bound of the deflate output for `len` input bytes, stored blocks included.
fn deflate_bound(len: usize) -> usize {
    len + len / 1000 + 64
}

impl CompressedData {
    /// Compresses `data`, usually a serialized packet sequence.
    pub fn from_raw(alg: CompressionAlgorithm, data: &[u8]) -> Result<Self> {
        // sized up front, a realloc would leave an unwiped copy behind
        let compressed_data = match alg {
            CompressionAlgorithm::Uncompressed => Zeroizing::new(data.to_vec()),
            CompressionAlgorithm::ZIP => {
                let out = Vec::with_capacity(deflate_bound(data.len()));
                let mut enc = DeflateEncoder::new(out, Compression::default());
                enc.write_all(data)?;
                Zeroizing::new(enc.finish()?)
            }
            CompressionAlgorithm::ZLIB => {
                let out = Vec::with_capacity(deflate_bound(data.len()));
                let mut enc = ZlibEncoder::new(out, Compression::default());
                enc.write_all(data)?;
                Zeroizing::new(enc.finish()?)
            }
            CompressionAlgorithm::BZip2 | CompressionAlgorithm::Other(_) => {
                crate::unsupported_err!("compression algorithm {:?}", alg)
            }
        };
        debug!(
            "compressed {} bytes to {} with {:?}",
            data.len(),
            compressed_data.len(),
            alg
        );

        Ok(CompressedData {
            compression_algorithm: alg,
            compressed_data,
        })
    }

    /// Parses a `CompressedData` packet body.
    pub fn from_buf(mut i: Bytes) -> Result<Self> {
        let alg = CompressionAlgorithm::from(i.read_u8()?);

        Ok(CompressedData {
            compression_algorithm: alg,
            compressed_data: Zeroizing::new(i.rest().to_vec()),
        })
    }

    pub fn compression_algorithm(&self) -> CompressionAlgorithm {
        self.compression_algorithm
    }

    pub fn compressed_data(&self) -> &[u8] {
        &self.compressed_data
    }

    /// Inflates the contained data.
    pub fn decompress(&self) -> Result<Zeroizing<Vec<u8>>> {
        let mut out = Zeroizing::new(Vec::new());
        match self.compression_algorithm {
            CompressionAlgorithm::Uncompressed => out.extend_from_slice(&self.compressed_data),
            CompressionAlgorithm::ZIP => {
                DeflateDecoder::new(&self.compressed_data[..])
                    .read_to_end(&mut out)
                    .map_err(|err| crate::malformed_err!("invalid deflate stream: {}", err))?;
            }
            CompressionAlgorithm::ZLIB => {
                ZlibDecoder::new(&self.compressed_data[..])
                    .read_to_end(&mut out)
                    .map_err(|err| crate::malformed_err!("invalid zlib stream: {}", err))?;
            }
            alg => crate::unsupported_err!("compression algorithm {:?}", alg),
        }

        Ok(out)
    }
}

impl Serialize for CompressedData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.compression_algorithm.into())?;
        writer.write_all(&self.compressed_data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.compressed_data.len()
    }
}

impl PacketTrait for CompressedData {
    fn tag(&self) -> Tag {
        Tag::CompressedData
    }
}
