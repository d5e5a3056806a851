mod compression;
mod fingerprint;
mod key_id;
mod mpi;
mod packet;
mod params;
mod pkesk;
mod s2k;

pub use self::compression::CompressionAlgorithm;
pub use self::fingerprint::Fingerprint;
pub use self::key_id::{KeyId, WILDCARD_KEY_ID};
pub use self::mpi::Mpi;
pub use self::packet::{KeyVersion, PacketHeaderVersion, PacketLength, Tag};
pub use self::params::{
    DsaPublicParams, ElgamalPublicParams, EncryptedSecretParams, PlainSecretParams, PublicParams,
    RsaPublicParams, SecretParams,
};
pub use self::pkesk::PkeskBytes;
pub use self::s2k::{StringToKey, StringToKeyType};
