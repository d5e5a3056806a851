use std::io;

use bytes::Bytes;
use log::debug;

use crate::errors::{Error, Result};
use crate::packet::{
    LiteralData, ModDetectionCode, PacketHeader, PacketTrait, PublicKey,
    PublicKeyEncryptedSessionKey, RawPacket, SecretKey, SymEncryptedProtectedData,
};
use crate::ser::Serialize;
use crate::types::Tag;

/// The closed sum of all packet kinds this crate interprets.
///
/// Tags outside of this set are carried through as [`Packet::Raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    PublicKeyEncryptedSessionKey(PublicKeyEncryptedSessionKey),
    SecretKey(SecretKey),
    PublicKey(PublicKey),
    LiteralData(LiteralData),
    SymEncryptedProtectedData(SymEncryptedProtectedData),
    ModDetectionCode(ModDetectionCode),
    Raw(RawPacket),
}

impl Packet {
    /// Decodes the assembled body of a framed packet.
    ///
    /// Decode errors are wrapped with the offending tag; unrecognized tags
    /// are preserved raw instead of failing.
    pub fn decode(header: PacketHeader, body: Bytes) -> Result<Self> {
        let tag = header.tag();
        let mut body = body;

        let res = match tag {
            Tag::PublicKeyEncryptedSessionKey => {
                PublicKeyEncryptedSessionKey::from_buf(header, &mut body).map(Into::into)
            }
            Tag::SecretKey => SecretKey::from_buf(header, &mut body).map(Into::into),
            Tag::PublicKey => PublicKey::from_buf(header, &mut body).map(Into::into),
            Tag::LiteralData => LiteralData::from_buf(header, &mut body).map(Into::into),
            Tag::SymEncryptedProtectedData => {
                SymEncryptedProtectedData::from_buf(header, &mut body).map(Into::into)
            }
            Tag::ModDetectionCode => ModDetectionCode::from_buf(header, &mut body).map(Into::into),
            _ => return Ok(Packet::Raw(RawPacket::new(header, body))),
        };

        res.map_err(|err| {
            debug!("invalid packet {:?}: {:?}", tag, err);
            Error::InvalidPacketContent {
                tag,
                source: Box::new(err),
            }
        })
    }

    pub fn tag(&self) -> Tag {
        self.packet_header().tag()
    }
}

impl PacketTrait for Packet {
    fn packet_header(&self) -> &PacketHeader {
        match self {
            Packet::PublicKeyEncryptedSessionKey(p) => p.packet_header(),
            Packet::SecretKey(p) => p.packet_header(),
            Packet::PublicKey(p) => p.packet_header(),
            Packet::LiteralData(p) => p.packet_header(),
            Packet::SymEncryptedProtectedData(p) => p.packet_header(),
            Packet::ModDetectionCode(p) => p.packet_header(),
            Packet::Raw(p) => p.packet_header(),
        }
    }
}

impl Serialize for Packet {
    /// Writes the full packet: header and body.
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.packet_header().to_writer(writer)?;

        match self {
            Packet::PublicKeyEncryptedSessionKey(p) => p.to_writer(writer),
            Packet::SecretKey(p) => p.to_writer(writer),
            Packet::PublicKey(p) => p.to_writer(writer),
            Packet::LiteralData(p) => p.to_writer(writer),
            Packet::SymEncryptedProtectedData(p) => p.to_writer(writer),
            Packet::ModDetectionCode(p) => p.to_writer(writer),
            Packet::Raw(p) => p.to_writer(writer),
        }
    }

    fn write_len(&self) -> usize {
        let body_len = match self {
            Packet::PublicKeyEncryptedSessionKey(p) => p.write_len(),
            Packet::SecretKey(p) => p.write_len(),
            Packet::PublicKey(p) => p.write_len(),
            Packet::LiteralData(p) => p.write_len(),
            Packet::SymEncryptedProtectedData(p) => p.write_len(),
            Packet::ModDetectionCode(p) => p.write_len(),
            Packet::Raw(p) => p.write_len(),
        };
        self.packet_header().write_len() + body_len
    }
}

impl From<PublicKeyEncryptedSessionKey> for Packet {
    fn from(other: PublicKeyEncryptedSessionKey) -> Packet {
        Packet::PublicKeyEncryptedSessionKey(other)
    }
}

impl From<SecretKey> for Packet {
    fn from(other: SecretKey) -> Packet {
        Packet::SecretKey(other)
    }
}

impl From<PublicKey> for Packet {
    fn from(other: PublicKey) -> Packet {
        Packet::PublicKey(other)
    }
}

impl From<LiteralData> for Packet {
    fn from(other: LiteralData) -> Packet {
        Packet::LiteralData(other)
    }
}

impl From<SymEncryptedProtectedData> for Packet {
    fn from(other: SymEncryptedProtectedData) -> Packet {
        Packet::SymEncryptedProtectedData(other)
    }
}

impl From<ModDetectionCode> for Packet {
    fn from(other: ModDetectionCode) -> Packet {
        Packet::ModDetectionCode(other)
    }
}

impl From<RawPacket> for Packet {
    fn from(other: RawPacket) -> Packet {
        Packet::Raw(other)
    }
}
