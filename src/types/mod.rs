mod compression;
mod fingerprint;
mod key_id;
mod mpi;
mod packet;
mod params;
mod pkesk;
mod session_key;

pub use self::compression::CompressionAlgorithm;
pub use self::fingerprint::Fingerprint;
pub use self::key_id::KeyId;
pub use self::mpi::{Mpi, MAX_MPI_BITS};
pub use self::packet::{KeyVersion, PacketHeaderVersion, PacketLength, Tag, MAX_PARTIAL_LEN};
pub use self::params::{EcdhPublicParams, PublicParams, RsaPublicParams, MAX_RSA_BITS};
pub use self::pkesk::PkeskBytes;
pub use self::session_key::SessionKey;
