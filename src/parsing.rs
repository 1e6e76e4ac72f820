//! Parsing functions to parse data using [Buf].

use bytes::{Buf, Bytes};

use crate::errors::{Error, Result};

fn too_short(what: &str, needed: usize, remaining: usize) -> Error {
    Error::PacketMalformed {
        message: format!("reading {what}: needed {needed}, remaining {remaining}"),
    }
}

pub trait BufParsing: Buf + Sized {
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining("u8", 1)?;
        Ok(self.get_u8())
    }

    fn read_be_u16(&mut self) -> Result<u16> {
        self.ensure_remaining("u16", 2)?;
        Ok(self.get_u16())
    }

    fn read_be_u32(&mut self) -> Result<u32> {
        self.ensure_remaining("u32", 4)?;
        Ok(self.get_u32())
    }

    fn read_array<const C: usize>(&mut self) -> Result<[u8; C]> {
        self.ensure_remaining("array", C)?;
        let mut arr = [0u8; C];
        self.copy_to_slice(&mut arr);
        Ok(arr)
    }

    fn read_take(&mut self, size: usize) -> Result<Bytes> {
        self.ensure_remaining("bytes", size)?;
        Ok(self.copy_to_bytes(size))
    }

    fn rest(&mut self) -> Bytes {
        let len = self.remaining();
        self.copy_to_bytes(len)
    }

    fn ensure_remaining(&self, what: &str, size: usize) -> Result<()> {
        if self.remaining() < size {
            return Err(too_short(what, size, self.remaining()));
        }
        Ok(())
    }

    /// Fails if any bytes are left over.
    fn ensure_empty(&self, context: &str) -> Result<()> {
        if self.has_remaining() {
            return Err(Error::PacketMalformed {
                message: format!("{context}: {} trailing bytes", self.remaining()),
            });
        }
        Ok(())
    }
}

impl<B: Buf> BufParsing for B {}
