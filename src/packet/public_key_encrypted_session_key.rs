use std::io;

use bytes::Buf;
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::crypto::{checksum, elgamal};
use crate::errors::{InvalidArgumentSnafu, Result};
use crate::packet::{PacketHeader, PacketTrait, PublicKey};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{KeyId, PkeskBytes, PublicParams, Tag};

/// Public Key Encrypted Session Key Packet (version 3)
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.1>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyEncryptedSessionKey {
    packet_header: PacketHeader,
    id: KeyId,
    algorithm: PublicKeyAlgorithm,
    values: PkeskBytes,
}

impl PublicKeyEncryptedSessionKey {
    /// Parses a `PublicKeyEncryptedSessionKey` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut input: B) -> Result<Self> {
        ensure_eq!(
            packet_header.tag(),
            Tag::PublicKeyEncryptedSessionKey,
            "invalid tag"
        );

        let version = input.read_u8()?;
        ensure_eq!(version, 0x03, "invalid version");

        let id = KeyId::try_from_buf(&mut input)?;
        let algorithm = PublicKeyAlgorithm::try_lookup(input.read_u8()?)?;
        let values = PkeskBytes::try_from_buf(algorithm, &mut input)?;

        ensure!(!input.has_remaining(), "trailing bytes in session key packet");

        Ok(PublicKeyEncryptedSessionKey {
            packet_header,
            id,
            algorithm,
            values,
        })
    }

    /// Wraps a session key to the given recipient key.
    ///
    /// The wrapped blob is `algorithm || session key || checksum`, EME-PKCS1
    /// encoded and encrypted to the recipient. Only Elgamal keys can be
    /// encrypted to; everything else is rejected as unsupported.
    pub fn from_session_key<R: CryptoRng + Rng>(
        mut rng: R,
        alg: SymmetricKeyAlgorithm,
        session_key: &[u8],
        key: &PublicKey,
    ) -> Result<Self> {
        if session_key.len() != alg.key_size() {
            return Err(InvalidArgumentSnafu {
                message: format!(
                    "invalid session key size {} for {:?}",
                    session_key.len(),
                    alg
                ),
            }
            .build());
        }

        let mut wrapped = Zeroizing::new(Vec::with_capacity(session_key.len() + 3));
        wrapped.push(u8::from(alg));
        wrapped.extend_from_slice(session_key);
        wrapped.extend_from_slice(&checksum::calculate_simple(session_key).to_be_bytes());

        let values = match key.public_params() {
            PublicParams::Elgamal(params) => {
                let (first, second) = elgamal::encrypt(&mut rng, params, &wrapped)?;
                PkeskBytes::Elgamal { first, second }
            }
            _ => unsupported_err!(
                "session key wrap for algorithm {:?}",
                key.algorithm()
            ),
        };

        let id = key.key_id();
        let algorithm = key.algorithm();

        let len = 1 + 8 + 1 + values.write_len();
        let packet_header =
            PacketHeader::new_fixed(Tag::PublicKeyEncryptedSessionKey, len as u32);

        Ok(PublicKeyEncryptedSessionKey {
            packet_header,
            id,
            algorithm,
            values,
        })
    }

    pub fn version(&self) -> u8 {
        3
    }

    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn values(&self) -> &PkeskBytes {
        &self.values
    }
}

impl Serialize for PublicKeyEncryptedSessionKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[0x03])?;
        writer.write_all(self.id.as_ref())?;
        writer.write_all(&[u8::from(self.algorithm)])?;
        self.values.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + 8 + 1 + self.values.write_len()
    }
}

impl PacketTrait for PublicKeyEncryptedSessionKey {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}
