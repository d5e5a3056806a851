use std::io;

use bytes::Bytes;

use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::ser::Serialize;

/// A packet that is framed but not interpreted: the body is preserved as raw
/// bytes so the packet can be re-emitted unchanged.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct RawPacket {
    packet_header: PacketHeader,
    #[debug("{}", hex::encode(data))]
    data: Bytes,
}

impl RawPacket {
    pub fn new(packet_header: PacketHeader, data: Bytes) -> Self {
        RawPacket {
            packet_header,
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_body(self) -> Bytes {
        self.data
    }
}

impl Serialize for RawPacket {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.data)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.data.len()
    }
}

impl PacketTrait for RawPacket {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
