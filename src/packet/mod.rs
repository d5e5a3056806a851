mod header;
mod literal_data;
mod many;
mod mod_detection_code;
mod packet_sum;
mod public_key;
mod public_key_encrypted_session_key;
mod raw;
mod secret_key;
mod sym_encrypted_protected_data;

pub use self::header::PacketHeader;
pub use self::literal_data::{DataMode, LiteralData, LiteralDataHeader};
pub use self::many::PacketParser;
pub use self::mod_detection_code::ModDetectionCode;
pub use self::packet_sum::Packet;
pub use self::public_key::{PubKeyInner, PublicKey};
pub use self::public_key_encrypted_session_key::PublicKeyEncryptedSessionKey;
pub use self::raw::RawPacket;
pub use self::secret_key::SecretKey;
pub use self::sym_encrypted_protected_data::SymEncryptedProtectedData;

use crate::ser::Serialize;
use crate::types::Tag;

/// Shared behavior of all packet types.
pub trait PacketTrait: Serialize {
    fn packet_header(&self) -> &PacketHeader;

    fn tag(&self) -> Tag {
        self.packet_header().tag()
    }
}

impl<T: PacketTrait> PacketTrait for &T {
    fn packet_header(&self) -> &PacketHeader {
        (*self).packet_header()
    }
}
