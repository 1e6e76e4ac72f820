use std::io;

use byteorder::WriteBytesExt;
use bytes::{Buf, Bytes};

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// Algorithm specific part of a public key encrypted session key.
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub enum PkeskBytes {
    Rsa {
        mpi: Mpi,
    },
    Ecdh {
        /// Ephemeral public point, native prefixed or SEC1 uncompressed.
        public_point: Mpi,
        #[debug("{}", hex::encode(encrypted_session_key))]
        encrypted_session_key: Bytes,
    },
    Other {
        #[debug("{}", hex::encode(raw))]
        raw: Bytes,
    },
}

impl PkeskBytes {
    pub fn from_buf<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<Self> {
        match alg {
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt => Ok(PkeskBytes::Rsa {
                mpi: Mpi::from_buf(i)?,
            }),
            PublicKeyAlgorithm::ECDH => {
                let public_point = Mpi::from_buf(i)?;
                let len = i.read_u8()?;
                let encrypted_session_key = i.read_take(usize::from(len))?;
                Ok(PkeskBytes::Ecdh {
                    public_point,
                    encrypted_session_key,
                })
            }
            _ => Ok(PkeskBytes::Other { raw: i.rest() }),
        }
    }
}

impl Serialize for PkeskBytes {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PkeskBytes::Rsa { mpi } => mpi.to_writer(writer)?,
            PkeskBytes::Ecdh {
                public_point,
                encrypted_session_key,
            } => {
                public_point.to_writer(writer)?;
                let len = u8::try_from(encrypted_session_key.len()).map_err(|_| {
                    crate::malformed_err!(
                        "wrapped session key of {} bytes",
                        encrypted_session_key.len()
                    )
                })?;
                writer.write_u8(len)?;
                writer.write_all(encrypted_session_key)?;
            }
            PkeskBytes::Other { raw } => writer.write_all(raw)?,
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            PkeskBytes::Rsa { mpi } => mpi.write_len(),
            PkeskBytes::Ecdh {
                public_point,
                encrypted_session_key,
            } => public_point.write_len() + 1 + encrypted_session_key.len(),
            PkeskBytes::Other { raw } => raw.len(),
        }
    }
}
