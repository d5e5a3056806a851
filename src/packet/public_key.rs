use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use chrono::{DateTime, TimeZone, Utc};
use sha1_checked::{Digest, Sha1};

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::packet::{PacketHeader, PacketTrait};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyId, KeyVersion, PublicParams, Tag};

/// Public Key Packet (version 4)
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.5.1.1>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublicKey {
    packet_header: PacketHeader,
    inner: PubKeyInner,
}

/// The packet body shared between public and secret key packets.
#[derive(Debug, PartialEq, Eq, Clone)]
#[doc(hidden)]
pub struct PubKeyInner {
    algorithm: PublicKeyAlgorithm,
    created_at: DateTime<Utc>,
    public_params: PublicParams,
}

impl PubKeyInner {
    pub fn new(
        algorithm: PublicKeyAlgorithm,
        created_at: DateTime<Utc>,
        public_params: PublicParams,
    ) -> Result<Self> {
        ensure!(
            created_at.timestamp() >= 0 && created_at.timestamp() <= i64::from(u32::MAX),
            "key creation time does not fit four octets"
        );

        Ok(Self {
            algorithm,
            created_at,
            public_params,
        })
    }

    pub(crate) fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = KeyVersion::from(i.read_u8()?);
        ensure!(
            version == KeyVersion::V4,
            "unsupported key version {}",
            u8::from(version)
        );

        let created_at = i.read_be_u32()?;
        let created_at = Utc
            .timestamp_opt(created_at.into(), 0)
            .single()
            .ok_or_else(|| format_err!("invalid key creation time"))?;

        let algorithm = PublicKeyAlgorithm::from(i.read_u8()?);
        let public_params = PublicParams::try_from_buf(algorithm, &mut i)?;

        Self::new(algorithm, created_at, public_params)
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    /// The v4 fingerprint: SHA-1 over `0x99`, the two octet body length and
    /// the serialized body.
    pub fn fingerprint(&self) -> Fingerprint {
        let body = self.to_bytes().expect("serialize to vec");

        let mut h = Sha1::new();
        h.update([0x99]);
        h.update((body.len() as u16).to_be_bytes());
        h.update(&body);

        let digest = h.finalize();
        Fingerprint::new(digest.into())
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint().key_id()
    }
}

impl Serialize for PubKeyInner {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(KeyVersion::V4.into())?;
        writer.write_u32::<BigEndian>(self.created_at.timestamp() as u32)?;
        writer.write_u8(self.algorithm.into())?;
        self.public_params.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + 4 + 1 + self.public_params.write_len()
    }
}

impl PublicKey {
    /// Creates a new v4 `PublicKey` packet from the underlying parameters.
    pub fn new(
        algorithm: PublicKeyAlgorithm,
        created_at: DateTime<Utc>,
        public_params: PublicParams,
    ) -> Result<Self> {
        let inner = PubKeyInner::new(algorithm, created_at, public_params)?;
        Ok(Self::from_inner(inner))
    }

    pub(crate) fn from_inner(inner: PubKeyInner) -> Self {
        let packet_header = PacketHeader::new_fixed(Tag::PublicKey, inner.write_len() as u32);
        Self {
            packet_header,
            inner,
        }
    }

    /// Parses a `PublicKey` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut input: B) -> Result<Self> {
        ensure_eq!(packet_header.tag(), Tag::PublicKey, "invalid tag");

        let inner = PubKeyInner::try_from_buf(&mut input)?;
        ensure!(!input.has_remaining(), "trailing bytes in public key packet");

        Ok(Self {
            packet_header,
            inner,
        })
    }

    pub fn version(&self) -> KeyVersion {
        KeyVersion::V4
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.inner.algorithm()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at()
    }

    pub fn public_params(&self) -> &PublicParams {
        self.inner.public_params()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.inner.fingerprint()
    }

    pub fn key_id(&self) -> KeyId {
        self.inner.key_id()
    }

    pub(crate) fn into_inner(self) -> PubKeyInner {
        self.inner
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.inner.to_writer(writer)
    }

    fn write_len(&self) -> usize {
        self.inner.write_len()
    }
}

impl PacketTrait for PublicKey {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
