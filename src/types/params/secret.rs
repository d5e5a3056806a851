use std::io;

use bytes::{Buf, Bytes};

use crate::crypto::checksum;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::StringToKey;

use super::{EncryptedSecretParams, PlainSecretParams};

/// The secret half of a secret key packet: either plaintext material or a
/// passphrase protected blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParams {
    Plain(PlainSecretParams),
    Encrypted(EncryptedSecretParams),
}

impl SecretParams {
    pub fn is_encrypted(&self) -> bool {
        match self {
            SecretParams::Plain(_) => false,
            SecretParams::Encrypted(_) => true,
        }
    }

    /// The s2k usage octet this serializes to.
    pub fn s2k_usage(&self) -> u8 {
        match self {
            SecretParams::Plain(_) => 0,
            SecretParams::Encrypted(e) => e.usage(),
        }
    }

    /// Parses the secret part of a secret key packet, starting at the s2k
    /// usage octet. Consumes the rest of the buffer.
    pub fn try_from_buf<B: Buf>(mut i: B, alg: PublicKeyAlgorithm) -> Result<Self> {
        let s2k_usage = i.read_u8()?;

        match s2k_usage {
            // unencrypted, with a trailing two octet checksum
            0 => {
                let mut data: Bytes = i.rest();
                ensure!(data.len() > 2, "missing secret key checksum");

                let cs = data.split_off(data.len() - 2);
                checksum::simple([cs[0], cs[1]], &data)?;

                let params = PlainSecretParams::try_from_buf(&mut data, alg)?;
                Ok(SecretParams::Plain(params))
            }
            // symmetric algorithm and s2k specifier, followed by the IV and
            // the encrypted material
            254 | 255 => {
                let sym_alg = SymmetricKeyAlgorithm::try_lookup(i.read_u8()?)?;
                let s2k = StringToKey::try_from_buf(&mut i)?;
                let iv = i.read_take(sym_alg.block_size())?;
                let data = i.rest();

                Ok(SecretParams::Encrypted(EncryptedSecretParams::new_with_usage(
                    data,
                    iv,
                    sym_alg,
                    Some(s2k),
                    s2k_usage,
                )))
            }
            // legacy: the usage octet is the symmetric algorithm id itself,
            // the passphrase derivation is an implicit simple MD5
            id => {
                let sym_alg = SymmetricKeyAlgorithm::try_lookup(id)?;
                let iv = i.read_take(sym_alg.block_size())?;
                let data = i.rest();

                Ok(SecretParams::Encrypted(EncryptedSecretParams::new_with_usage(
                    data,
                    iv,
                    sym_alg,
                    None,
                    id,
                )))
            }
        }
    }
}

impl Serialize for SecretParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SecretParams::Plain(k) => {
                writer.write_all(&[0u8])?;
                k.to_writer(writer)
            }
            SecretParams::Encrypted(k) => k.to_writer(writer),
        }
    }

    fn write_len(&self) -> usize {
        match self {
            SecretParams::Plain(k) => 1 + k.write_len(),
            SecretParams::Encrypted(k) => k.write_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::crypto::hash::HashAlgorithm;
    use crate::errors::Error;

    fn plain_elgamal() -> PlainSecretParams {
        PlainSecretParams::Elgamal {
            x: b"some secret exponent".to_vec(),
        }
    }

    #[test]
    fn plain_roundtrip_verifies_checksum() {
        let params = SecretParams::Plain(plain_elgamal());
        let buf = params.to_bytes().unwrap();
        assert_eq!(buf.len(), params.write_len());

        let back =
            SecretParams::try_from_buf(&mut &buf[..], PublicKeyAlgorithm::ElgamalEncrypt).unwrap();
        assert_eq!(params, back);

        // corrupt the trailing checksum
        let mut bad = buf.clone();
        let last = bad.len() - 1;
        bad[last] ^= 0x01;
        let err = SecretParams::try_from_buf(&mut &bad[..], PublicKeyAlgorithm::ElgamalEncrypt)
            .unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn encrypted_roundtrip_and_unlock() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plain = plain_elgamal();
        let s2k = StringToKey::new_iterated(&mut rng, HashAlgorithm::SHA2_256, 224);

        let encrypted = plain
            .encrypt(&mut rng, "banana", s2k, SymmetricKeyAlgorithm::AES256)
            .unwrap();
        let params = SecretParams::Encrypted(encrypted);

        let buf = params.to_bytes().unwrap();
        assert_eq!(buf.len(), params.write_len());

        let back =
            SecretParams::try_from_buf(&mut &buf[..], PublicKeyAlgorithm::ElgamalEncrypt).unwrap();
        assert_eq!(params, back);

        let SecretParams::Encrypted(e) = back else {
            panic!("expected encrypted params")
        };
        assert_eq!(e.usage(), 254);

        let unlocked = e.unlock("banana", PublicKeyAlgorithm::ElgamalEncrypt).unwrap();
        assert_eq!(unlocked, plain);

        let err = e
            .unlock("not banana", PublicKeyAlgorithm::ElgamalEncrypt)
            .unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }
}
