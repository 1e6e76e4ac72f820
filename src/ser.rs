//! # Serialize trait module

use std::io;

use chrono::{DateTime, Utc};

use crate::errors::{Error, Result};

pub trait Serialize {
    fn to_writer<W: io::Write>(&self, _: &mut W) -> Result<()>;
    fn write_len(&self) -> usize;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.write_len());
        self.to_writer(&mut buf)?;

        Ok(buf)
    }
}

impl<T: Serialize> Serialize for &T {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        (*self).to_writer(writer)
    }

    fn write_len(&self) -> usize {
        (*self).write_len()
    }
}

impl<T: Serialize> Serialize for Vec<T> {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        for x in self {
            x.to_writer(writer)?;
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.iter().map(Serialize::write_len).sum()
    }
}

/// Converts a timestamp into the OpenPGP four octet representation.
///
/// Times before the epoch or after 2106 can not be represented.
pub(crate) fn time_to_u32(time: &DateTime<Utc>) -> Result<u32> {
    u32::try_from(time.timestamp()).map_err(|_| Error::InvalidConfig {
        message: format!("timestamp {time} is out of range"),
    })
}
