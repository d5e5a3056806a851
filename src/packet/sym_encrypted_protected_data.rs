use std::io;

use bytes::{Buf, Bytes};
use log::debug;
use rand::{CryptoRng, Rng};
use sha1::{Digest, Sha1};

use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::{Error, InvalidArgumentSnafu, Result};
use crate::packet::{PacketHeader, PacketTrait};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Tag;

/// MDC is 1 byte packet tag, 1 byte length prefix and 20 bytes SHA1 hash.
const MDC_LEN: usize = 22;

/// The fixed framing of the embedded MDC packet: tag 19, length 20.
const MDC_HEADER: [u8; 2] = [0xD3, 0x14];

/// Symmetrically Encrypted Integrity Protected Data Packet (version 1)
///
/// The ciphertext wraps `prefix || payload || mdc`, where the prefix is one
/// block of random data with its last two octets repeated, and the mdc is a
/// full modification detection code packet over everything before its digest.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.13>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SymEncryptedProtectedData {
    packet_header: PacketHeader,
    #[debug("{}", hex::encode(data))]
    data: Bytes,
}

impl SymEncryptedProtectedData {
    /// Parses a `SymEncryptedProtectedData` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut input: B) -> Result<Self> {
        ensure_eq!(
            packet_header.tag(),
            Tag::SymEncryptedProtectedData,
            "invalid tag"
        );

        let version = input.read_u8()?;
        ensure_eq!(version, 0x01, "first octet must be 0x01");

        let data = input.rest();
        ensure!(!data.is_empty(), "missing ciphertext");

        Ok(SymEncryptedProtectedData {
            packet_header,
            data,
        })
    }

    /// Encrypts the serialized payload packets in `plaintext`.
    ///
    /// Builds `prefix || plaintext || mdc` and encrypts the whole buffer with
    /// one CFB keystream over an all-zero IV; the CFB register is not
    /// resynchronized after the prefix.
    pub fn encrypt<R: CryptoRng + Rng>(
        mut rng: R,
        alg: SymmetricKeyAlgorithm,
        key: &[u8],
        plaintext: &[u8],
    ) -> Result<Self> {
        if key.len() != alg.key_size() {
            return Err(InvalidArgumentSnafu {
                message: format!("invalid key size {} for {:?}", key.len(), alg),
            }
            .build());
        }
        debug!("protected encrypt of {} bytes", plaintext.len());

        let bs = alg.block_size();

        // one block of random data, the last two octets repeated as the
        // decryption quick check
        let mut prefix = vec![0u8; bs + 2];
        rng.fill_bytes(&mut prefix[..bs]);
        prefix[bs] = prefix[bs - 2];
        prefix[bs + 1] = prefix[bs - 1];

        let mut hasher = Sha1::default();
        hasher.update(&prefix);
        hasher.update(plaintext);
        hasher.update(MDC_HEADER);

        let mut buffer = Vec::with_capacity(prefix.len() + plaintext.len() + MDC_LEN);
        buffer.extend_from_slice(&prefix);
        buffer.extend_from_slice(plaintext);
        buffer.extend_from_slice(&MDC_HEADER);
        buffer.extend_from_slice(&hasher.finalize()[..]);

        alg.encrypt_cfb(key, &mut buffer)?;

        let packet_header =
            PacketHeader::new_fixed(Tag::SymEncryptedProtectedData, (1 + buffer.len()) as u32);

        Ok(SymEncryptedProtectedData {
            packet_header,
            data: buffer.into(),
        })
    }

    /// Decrypts the packet and returns the inner payload bytes, without the
    /// random prefix and without the trailing MDC packet.
    ///
    /// Both the prefix quick check and the MDC digest must pass; either
    /// failure is reported as the same opaque
    /// [`Error::IntegrityCheckFailed`].
    pub fn decrypt(&self, alg: SymmetricKeyAlgorithm, key: &[u8]) -> Result<Bytes> {
        let bs = alg.block_size();
        ensure!(
            self.data.len() >= bs + 2 + MDC_LEN,
            "invalid ciphertext length {}",
            self.data.len()
        );
        debug!("protected decrypt of {} bytes", self.data.len());

        let mut buffer = self.data.to_vec();
        alg.decrypt_cfb(key, &mut buffer)?;

        // quick check: the last two prefix octets repeat
        if buffer[bs - 2] != buffer[bs] || buffer[bs - 1] != buffer[bs + 1] {
            return Err(Error::IntegrityCheckFailed);
        }

        // the trailing MDC packet covers everything before its digest
        let mdc_start = buffer.len() - MDC_LEN;
        let mut hasher = Sha1::default();
        hasher.update(&buffer[..mdc_start + 2]);
        let expected: [u8; 20] = hasher.finalize().into();

        let mdc = &buffer[mdc_start..];
        if mdc[..2] != MDC_HEADER || mdc[2..] != expected {
            return Err(Error::IntegrityCheckFailed);
        }

        Ok(Bytes::from(buffer).slice(bs + 2..mdc_start))
    }

    /// The raw ciphertext, without the version octet.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Serialize for SymEncryptedProtectedData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[0x01])?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.data.len()
    }
}

impl PacketTrait for SymEncryptedProtectedData {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for alg in [
            SymmetricKeyAlgorithm::AES128,
            SymmetricKeyAlgorithm::AES192,
            SymmetricKeyAlgorithm::AES256,
        ] {
            let mut key = vec![0u8; alg.key_size()];
            rng.fill_bytes(&mut key);

            let payload = b"some serialized packets";
            let packet = SymEncryptedProtectedData::encrypt(&mut rng, alg, &key, payload).unwrap();

            let back = packet.decrypt(alg, &key).unwrap();
            assert_eq!(&back[..], &payload[..]);
        }
    }

    #[test]
    fn empty_payload_still_carries_prefix_and_mdc() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let alg = SymmetricKeyAlgorithm::AES128;
        let key = vec![7u8; alg.key_size()];

        let packet = SymEncryptedProtectedData::encrypt(&mut rng, alg, &key, &[]).unwrap();
        assert_eq!(packet.data().len(), alg.block_size() + 2 + MDC_LEN);

        let back = packet.decrypt(alg, &key).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn wrong_key_fails_integrity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let alg = SymmetricKeyAlgorithm::AES256;
        let key = vec![1u8; alg.key_size()];
        let wrong = vec![2u8; alg.key_size()];

        let packet = SymEncryptedProtectedData::encrypt(&mut rng, alg, &key, b"payload").unwrap();
        let err = packet.decrypt(alg, &wrong).unwrap_err();
        assert!(matches!(err, Error::IntegrityCheckFailed));
    }

    #[test]
    fn bit_flips_fail_integrity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let alg = SymmetricKeyAlgorithm::AES128;
        let key = vec![9u8; alg.key_size()];

        let packet =
            SymEncryptedProtectedData::encrypt(&mut rng, alg, &key, b"an important message")
                .unwrap();

        for pos in 0..packet.data().len() {
            let mut data = packet.data().to_vec();
            data[pos] ^= 0x40;

            let tampered = SymEncryptedProtectedData {
                packet_header: packet.packet_header,
                data: data.into(),
            };
            let err = tampered.decrypt(alg, &key).unwrap_err();
            assert!(
                matches!(err, Error::IntegrityCheckFailed),
                "flip at {pos} slipped through"
            );
        }
    }

    #[test]
    fn version_octet_is_checked() {
        let header = PacketHeader::new_fixed(Tag::SymEncryptedProtectedData, 4);
        assert!(SymEncryptedProtectedData::from_buf(header, &mut &[0x02, 0, 0, 0][..]).is_err());
    }
}
