use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Tag;

/// Modification Detection Code Packet
///
/// Always exactly 20 octets: the SHA-1 over the preceding plaintext of a v1
/// integrity protected data packet.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.14>
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct ModDetectionCode {
    packet_header: PacketHeader,
    /// 20 byte SHA1 hash of the preceding plaintext data.
    #[debug("{}", hex::encode(hash))]
    hash: [u8; 20],
}

impl ModDetectionCode {
    /// Parses a `ModDetectionCode` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut input: B) -> Result<Self> {
        ensure_eq!(packet_header.tag(), Tag::ModDetectionCode, "invalid tag");

        let hash = input.read_array::<20>()?;
        ensure!(!input.has_remaining(), "trailing bytes after the digest");

        Ok(ModDetectionCode {
            packet_header,
            hash,
        })
    }

    pub fn hash(&self) -> &[u8; 20] {
        &self.hash
    }
}

impl Serialize for ModDetectionCode {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.hash[..])?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.hash.len()
    }
}

impl PacketTrait for ModDetectionCode {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn exactly_twenty_octets() {
        let header = PacketHeader::new_fixed(Tag::ModDetectionCode, 20);

        let mdc = ModDetectionCode::from_buf(header, &mut &[0xABu8; 20][..]).unwrap();
        assert_eq!(mdc.hash(), &[0xAB; 20]);

        assert!(ModDetectionCode::from_buf(header, &mut &[0xABu8; 19][..]).is_err());
        assert!(ModDetectionCode::from_buf(header, &mut &[0xABu8; 21][..]).is_err());
    }
}
