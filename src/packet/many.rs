use std::io::{self, BufRead};

use bytes::{Bytes, BytesMut};
use log::debug;

use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketHeader};
use crate::parsing_reader::BufReadParsing;
use crate::types::{PacketLength, Tag};

/// Tags that may legally use partial body lengths.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-4.2.2.4>
fn supports_partial(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::LiteralData | Tag::CompressedData | Tag::SymEncryptedData | Tag::SymEncryptedProtectedData
    )
}

/// Reads packets from a byte stream.
///
/// Unknown tags yield [`Packet::Raw`] without error; a body that fails to
/// decode yields [`Error::InvalidPacketContent`] and parsing continues with
/// the next packet; framing errors (truncation, unreadable headers) end the
/// iteration.
pub struct PacketParser<R> {
    reader: R,
    failed: bool,
}

impl<R: BufRead> PacketParser<R> {
    pub fn new(reader: R) -> Self {
        PacketParser {
            reader,
            failed: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for PacketParser<R> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.reader.has_remaining() {
            Ok(false) => return None,
            Ok(true) => {}
            Err(err) => {
                self.failed = true;
                return Some(Err(err.into()));
            }
        }

        match read_packet(&mut self.reader) {
            Ok(packet) => Some(Ok(packet)),
            Err(err @ Error::InvalidPacketContent { .. }) => {
                // the framing was sound, only this body is bad
                Some(Err(err))
            }
            Err(err) => {
                debug!("unrecoverable parsing error: {:?}", err);
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Reads a single packet: header, body (reassembling partial chunks), and
/// dispatches the body to the matching decoder.
fn read_packet<R: BufRead>(mut r: R) -> Result<Packet> {
    let header = PacketHeader::try_from_reader(&mut r)?;
    debug!("read packet header {:?}", header);

    let body = match header.packet_length() {
        PacketLength::Fixed(len) => r
            .take_bytes(len as usize)
            .map_err(truncated)?
            .freeze(),
        PacketLength::Indeterminate => r.rest()?.freeze(),
        PacketLength::Partial(first) => read_partial_body(&mut r, header.tag(), first)?,
    };

    // the assembled body gets a canonical fixed length header
    let header = match header.packet_length() {
        PacketLength::Partial(_) => header.with_length(PacketLength::Fixed(body.len() as u32)),
        _ => header,
    };

    Packet::decode(header, body)
}

/// Collects the chunks of a partial length body. Every chunk but the final
/// one carries a partial length; the final chunk carries a fixed length.
fn read_partial_body<R: BufRead>(mut r: R, tag: Tag, first: u32) -> Result<Bytes> {
    ensure!(
        supports_partial(tag),
        "partial body length is not allowed for packet type {:?}",
        tag
    );

    let mut body = BytesMut::new();
    body.extend_from_slice(&r.take_bytes(first as usize).map_err(truncated)?);

    loop {
        let length = PacketLength::try_from_reader(&mut r).map_err(truncated)?;
        match length {
            PacketLength::Partial(len) => {
                body.extend_from_slice(&r.take_bytes(len as usize).map_err(truncated)?);
            }
            PacketLength::Fixed(len) => {
                // the terminal chunk
                body.extend_from_slice(&r.take_bytes(len as usize).map_err(truncated)?);
                break;
            }
            PacketLength::Indeterminate => {
                bail!("indeterminate length inside a partial body");
            }
        }
    }

    Ok(body.freeze())
}

fn truncated(err: io::Error) -> Error {
    format_err!("truncated packet stream: {}", err)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::ser::Serialize;

    #[test]
    fn parses_consecutive_packets() {
        // two minimal literal data packets
        let mut stream = Vec::new();
        stream.extend_from_slice(&[
            0xCB, 0x08, b'b', 0x00, 0x00, 0x00, 0x00, 0x00, b'h', b'i',
        ]);
        stream.extend_from_slice(&[
            0xCB, 0x08, b'b', 0x00, 0x00, 0x00, 0x00, 0x00, b'h', b'o',
        ]);

        let packets: Vec<_> = PacketParser::new(&stream[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].tag(), Tag::LiteralData);

        // re-emission is byte identical for canonical forms
        let mut out = Vec::new();
        for packet in &packets {
            packet.to_writer(&mut out).unwrap();
        }
        assert_eq!(out, stream);
    }

    #[test]
    fn partial_bodies_are_reassembled() {
        // literal data packet with a 4 octet partial chunk followed by a
        // 4 octet terminal chunk
        let stream = [
            0xCB, 0xE2, b'b', 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, b'h', b'i',
        ];

        let packets: Vec<_> = PacketParser::new(&stream[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(packets.len(), 1);

        let Packet::LiteralData(ref data) = packets[0] else {
            panic!("expected literal data");
        };
        assert_eq!(data.data(), b"hi");
    }

    #[test]
    fn unterminated_partial_body_is_fatal() {
        // the stream ends while the body is still partial
        let stream = [0xCB, 0xE2, b'b', 0x00, 0x00, 0x00];

        let mut parser = PacketParser::new(&stream[..]);
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn partial_body_on_wrong_tag_is_rejected() {
        // tag 19 must not use partial lengths
        let stream = [0xD3, 0xE2, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

        let mut parser = PacketParser::new(&stream[..]);
        assert!(parser.next().unwrap().is_err());
    }

    #[test]
    fn truncated_fixed_body_is_fatal() {
        let stream = [0xCB, 0x08, b'b', 0x00];

        let mut parser = PacketParser::new(&stream[..]);
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let mut parser = PacketParser::new(&[][..]);
        assert!(parser.next().is_none());
    }
}
