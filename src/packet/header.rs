use std::io::{self, BufRead};

use byteorder::{BigEndian, WriteBytesExt};

use crate::errors::Result;
use crate::parsing_reader::BufReadParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Maximum size of a partial packet chunk.
const MAX_PARTIAL_LEN: u32 = 2u32.pow(30);

/// Represents a packet header.
///
/// Bit 7 of the first octet is always set; bit 6 selects the format. Old
/// format headers carry the tag in bits 5..2 and the length type in bits
/// 1..0, new format headers carry the tag in bits 5..0 and encode the length
/// in the following octets.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-4.2>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PacketHeader {
    Old { tag: Tag, length: PacketLength },
    New { tag: Tag, length: PacketLength },
}

impl PacketHeader {
    /// Parses a single packet header from the given reader.
    pub fn try_from_reader<R: BufRead>(mut r: R) -> Result<Self> {
        let first = r.read_u8()?;
        ensure!(
            first & 0b1000_0000 != 0,
            "invalid packet header 0b{:08b}",
            first
        );

        if first & 0b0100_0000 != 0 {
            // new format
            let tag = Tag::from(first & 0b0011_1111);
            let length = PacketLength::try_from_reader(&mut r)?;
            Ok(PacketHeader::New { tag, length })
        } else {
            // old format
            let tag = Tag::from((first & 0b0011_1100) >> 2);
            let length = match first & 0b0000_0011 {
                // One-Octet Lengths
                0 => PacketLength::Fixed(r.read_u8()?.into()),
                // Two-Octet Lengths
                1 => PacketLength::Fixed(r.read_be_u16()?.into()),
                // Four-Octet Lengths
                2 => PacketLength::Fixed(r.read_be_u32()?),
                3 => PacketLength::Indeterminate,
                _ => unreachable!("old packet length type is only 2 bits"),
            };
            Ok(PacketHeader::Old { tag, length })
        }
    }

    /// Creates a `New` style packet header with a fixed length.
    pub fn new_fixed(tag: Tag, length: u32) -> Self {
        PacketHeader::New {
            tag,
            length: PacketLength::Fixed(length),
        }
    }

    /// Creates a header from its parts, validating the combination.
    pub fn from_parts(version: PacketHeaderVersion, tag: Tag, length: PacketLength) -> Result<Self> {
        match version {
            PacketHeaderVersion::Old => {
                ensure!(
                    tag.is_old_format_compatible(),
                    "tag is not compatible with old style headers: {:?}",
                    tag
                );
                ensure!(
                    !matches!(length, PacketLength::Partial(_)),
                    "partial lengths are only supported in new style headers"
                );
                Ok(PacketHeader::Old { tag, length })
            }
            PacketHeaderVersion::New => {
                ensure!(
                    !matches!(length, PacketLength::Indeterminate),
                    "indeterminate packet length is only supported in old style headers"
                );
                if let PacketLength::Partial(l) = length {
                    ensure!(l.count_ones() == 1, "partial length must be a power of two");
                    ensure!(
                        l <= MAX_PARTIAL_LEN,
                        "partial length must be less or equal than {}",
                        MAX_PARTIAL_LEN
                    );
                }
                Ok(PacketHeader::New { tag, length })
            }
        }
    }

    /// Returns the packet header version.
    pub const fn version(&self) -> PacketHeaderVersion {
        match self {
            Self::Old { .. } => PacketHeaderVersion::Old,
            Self::New { .. } => PacketHeaderVersion::New,
        }
    }

    /// Returns the packet length.
    pub fn packet_length(&self) -> PacketLength {
        match self {
            Self::Old { length, .. } => *length,
            Self::New { length, .. } => *length,
        }
    }

    /// Returns the packet tag.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Old { tag, .. } => *tag,
            Self::New { tag, .. } => *tag,
        }
    }

    /// The same header with a different length.
    pub(crate) fn with_length(self, length: PacketLength) -> Self {
        match self {
            Self::Old { tag, .. } => Self::Old { tag, length },
            Self::New { tag, .. } => Self::New { tag, length },
        }
    }
}

impl Serialize for PacketHeader {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::New { tag, length } => {
                writer.write_u8(0b1100_0000 | u8::from(*tag))?;
                length.to_writer_new(writer)?;
            }
            Self::Old { tag, length } => {
                let tag = u8::from(*tag);
                debug_assert!(tag < 16, "old style headers have 4 bit tags");

                match length {
                    PacketLength::Fixed(len) => {
                        if *len < 256 {
                            // one octet
                            writer.write_u8(0b1000_0000 | (tag << 2))?;
                            writer.write_u8(*len as u8)?;
                        } else if *len < 65536 {
                            // two octets
                            writer.write_u8(0b1000_0001 | (tag << 2))?;
                            writer.write_u16::<BigEndian>(*len as u16)?;
                        } else {
                            // four octets
                            writer.write_u8(0b1000_0010 | (tag << 2))?;
                            writer.write_u32::<BigEndian>(*len)?;
                        }
                    }
                    PacketLength::Indeterminate => {
                        writer.write_u8(0b1000_0011 | (tag << 2))?;
                    }
                    PacketLength::Partial(_) => {
                        unreachable!("invalid state: partial lengths for old style packet header");
                    }
                }
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            Self::New { length, .. } => match length {
                PacketLength::Fixed(len) => 1 + PacketLength::fixed_encoding_len(*len),
                PacketLength::Indeterminate => {
                    unreachable!("invalid state: indeterminate lengths for new style packet header")
                }
                PacketLength::Partial(_) => 1 + 1,
            },
            Self::Old { length, .. } => match length {
                PacketLength::Fixed(len) => {
                    if *len < 256 {
                        2
                    } else if *len < 65536 {
                        3
                    } else {
                        5
                    }
                }
                PacketLength::Indeterminate => 1,
                PacketLength::Partial(_) => {
                    unreachable!("invalid state: partial lengths for old style packet header")
                }
            },
        }
    }
}
