use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, Bytes};
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Tag;

/// Literal Data Packet
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.9>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct LiteralData {
    packet_header: PacketHeader,
    header: LiteralDataHeader,
    #[debug("{}", hex::encode(data))]
    data: Bytes,
}

#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct LiteralDataHeader {
    pub mode: DataMode,
    /// The filename, may contain non utf-8 bytes. At most 255 octets.
    pub file_name: Bytes,
    pub mtime: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, FromPrimitive, IntoPrimitive, PartialEq, Eq)]
#[repr(u8)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum DataMode {
    Binary = b'b',
    Text = b't',
    Utf8 = b'u',

    #[num_enum(catch_all)]
    #[cfg_attr(test, proptest(skip))]
    Other(u8),
}

impl LiteralData {
    /// Creates a literal data packet from the given bytes, with the current
    /// time as modification time.
    pub fn from_bytes(file_name: impl Into<Bytes>, data: Bytes) -> Self {
        Self::with_mtime(file_name, data, DataMode::Binary, Utc::now().trunc_subsecs(0))
    }

    /// Creates a literal data packet from the given string.
    pub fn from_str(file_name: impl Into<Bytes>, data: &str) -> Self {
        Self::with_mtime(
            file_name,
            Bytes::copy_from_slice(data.as_bytes()),
            DataMode::Utf8,
            Utc::now().trunc_subsecs(0),
        )
    }

    pub fn with_mtime(
        file_name: impl Into<Bytes>,
        data: Bytes,
        mode: DataMode,
        mtime: DateTime<Utc>,
    ) -> Self {
        let header = LiteralDataHeader {
            mode,
            file_name: file_name.into(),
            mtime,
        };
        let len = header.write_len() + data.len();
        let packet_header = PacketHeader::new_fixed(Tag::LiteralData, len as u32);

        LiteralData {
            packet_header,
            header,
            data,
        }
    }

    /// Parses a `LiteralData` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut data: B) -> Result<Self> {
        ensure_eq!(packet_header.tag(), Tag::LiteralData, "invalid tag");

        // Mode
        let mode = data.read_u8().map(DataMode::from)?;

        // Name
        let name_len = data.read_u8()?;
        let name = data.read_take(name_len.into())?;

        // Modification time
        let mtime = data.read_be_u32()?;
        let mtime = Utc
            .timestamp_opt(mtime.into(), 0)
            .single()
            .ok_or_else(|| format_err!("invalid mtime field"))?;

        let data = data.rest();

        Ok(LiteralData {
            packet_header,
            header: LiteralDataHeader {
                mode,
                file_name: name,
                mtime,
            },
            data,
        })
    }

    pub fn mode(&self) -> DataMode {
        self.header.mode
    }

    pub fn file_name(&self) -> &Bytes {
        &self.header.file_name
    }

    pub fn mtime(&self) -> DateTime<Utc> {
        self.header.mtime
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl AsRef<[u8]> for LiteralData {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Serialize for LiteralDataHeader {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let name = &self.file_name;
        writer.write_u8(self.mode.into())?;
        writer.write_u8(name.len().try_into().map_err(|_| {
            format_err!("file name of {} octets does not fit one octet", name.len())
        })?)?;
        writer.write_all(name)?;
        writer.write_u32::<BigEndian>(self.mtime.timestamp().try_into()?)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + 1 + self.file_name.len() + 4
    }
}

impl Serialize for LiteralData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.header.to_writer(writer)?;
        writer.write_all(&self.data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.header.write_len() + self.data.len()
    }
}

impl PacketTrait for LiteralData {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
