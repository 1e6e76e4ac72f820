use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, Bytes};
use num_bigint::BigUint;

use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;

/// Largest MPI we read or write, in bits. Matches the largest RSA modulus we accept.
pub const MAX_MPI_BITS: u16 = 16384;

/// A multiprecision integer, RFC 4880 section 3.2.
///
/// The inner value never has leading zero bytes, so it can be written without normalizing.
#[derive(Default, Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Mpi(#[debug("{}", hex::encode(_0))] Bytes);

impl Mpi {
    /// Parses a bit length prefixed MPI.
    pub fn from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let len_bits = i.read_be_u16()?;
        crate::ensure_packet!(
            len_bits <= MAX_MPI_BITS,
            "mpi of {} bits is too large",
            len_bits
        );
        let len_bytes = (usize::from(len_bits) + 7) >> 3;
        let n = i.read_take(len_bytes)?;
        let stripped = n.slice_ref(strip_leading_zeros(&n));

        Ok(Mpi(stripped))
    }

    /// Wraps raw big endian bytes, which must not be length prefixed.
    pub fn from_slice(raw: &[u8]) -> Self {
        Mpi(Bytes::copy_from_slice(strip_leading_zeros(raw)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of significant bits.
    pub fn bit_size(&self) -> usize {
        match self.0.first() {
            None => 0,
            Some(first) => self.0.len() * 8 - first.leading_zeros() as usize,
        }
    }
}

#[inline]
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    bytes
        .iter()
        .position(|b| *b != 0)
        .map_or(&[][..], |offset| &bytes[offset..])
}

impl AsRef<[u8]> for Mpi {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Mpi {
    fn to_writer<W: io::Write>(&self, w: &mut W) -> Result<()> {
        let bits = self.bit_size();
        crate::ensure_packet!(
            bits <= usize::from(MAX_MPI_BITS),
            "mpi of {} bits is too large",
            bits
        );
        w.write_u16::<BigEndian>(bits as u16)?;
        w.write_all(&self.0)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        2 + self.0.len()
    }
}

impl From<&BigUint> for Mpi {
    fn from(other: &BigUint) -> Self {
        Mpi::from_slice(&other.to_bytes_be())
    }
}

impl From<&Mpi> for BigUint {
    fn from(other: &Mpi) -> Self {
        BigUint::from_bytes_be(other.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_mpi() {
        // 511
        let mut buf = Bytes::from_static(&[0x00, 0x09, 0x01, 0xFF]);
        let mpi = Mpi::from_buf(&mut buf).unwrap();
        assert_eq!(mpi, Mpi::from_slice(&[0x01, 0xFF]));
        assert_eq!(mpi.bit_size(), 9);
        assert_eq!(mpi.to_bytes().unwrap(), [0x00, 0x09, 0x01, 0xFF]);
    }

    #[test]
    fn test_mpi_leading_zeros() {
        let mpi = Mpi::from_slice(&[0x00, 0x00, 0x40, 0x01]);
        assert_eq!(mpi.as_ref(), &[0x40, 0x01]);
        assert_eq!(mpi.to_bytes().unwrap(), [0x00, 0x0F, 0x40, 0x01]);

        assert_eq!(Mpi::from_slice(&[0, 0]).to_bytes().unwrap(), [0, 0]);
    }

    #[test]
    fn test_mpi_too_large() {
        let mut buf = Bytes::from_static(&[0x40, 0x01, 0xFF]);
        assert!(Mpi::from_buf(&mut buf).is_err());
    }

    #[test]
    fn test_mpi_truncated() {
        let mut buf = Bytes::from_static(&[0x00, 0x10, 0xFF]);
        assert!(Mpi::from_buf(&mut buf).is_err());
    }

    #[test]
    fn test_biguint() {
        let n = BigUint::from(65537u32);
        let mpi = Mpi::from(&n);
        assert_eq!(mpi.to_bytes().unwrap(), [0x00, 0x11, 0x01, 0x00, 0x01]);
        assert_eq!(BigUint::from(&mpi), n);
    }

    proptest! {
        #[test]
        fn bit_size_matches_value(v in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mpi = Mpi::from_slice(&v);
            let n = BigUint::from_bytes_be(&v);
            prop_assert_eq!(mpi.bit_size() as u64, n.bits() as u64);
        }
    }
}
