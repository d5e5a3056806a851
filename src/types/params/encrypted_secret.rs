use std::io;

use bytes::Bytes;
use zeroize::Zeroizing;

use crate::crypto::checksum;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::{ChecksumMismatchSnafu, Result};
use crate::ser::Serialize;
use crate::types::{PlainSecretParams, StringToKey};

/// Secret key material that is still passphrase protected.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSecretParams {
    /// The encrypted data, including the encrypted integrity trailer.
    data: Bytes,
    /// IV for the CFB decryption.
    iv: Bytes,
    /// The symmetric algorithm protecting the data.
    sym_alg: SymmetricKeyAlgorithm,
    /// The passphrase derivation. `None` for legacy keys whose usage octet is
    /// the symmetric algorithm id itself (implicit simple MD5).
    s2k: Option<StringToKey>,
    /// The s2k usage octet this was parsed from (or will serialize to).
    usage: u8,
}

impl EncryptedSecretParams {
    /// Creates usage 254 params: S2K specifier, CFB, SHA-1 trailer.
    pub fn new_protected(
        data: Bytes,
        iv: Bytes,
        sym_alg: SymmetricKeyAlgorithm,
        s2k: StringToKey,
    ) -> Self {
        EncryptedSecretParams {
            data,
            iv,
            sym_alg,
            s2k: Some(s2k),
            usage: 254,
        }
    }

    pub(crate) fn new_with_usage(
        data: Bytes,
        iv: Bytes,
        sym_alg: SymmetricKeyAlgorithm,
        s2k: Option<StringToKey>,
        usage: u8,
    ) -> Self {
        debug_assert_ne!(usage, 0, "invalid s2k usage for encrypted params");
        EncryptedSecretParams {
            data,
            iv,
            sym_alg,
            s2k,
            usage,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn sym_alg(&self) -> SymmetricKeyAlgorithm {
        self.sym_alg
    }

    pub fn string_to_key(&self) -> Option<&StringToKey> {
        self.s2k.as_ref()
    }

    pub fn usage(&self) -> u8 {
        self.usage
    }

    /// Derives the protection key from `passphrase`, decrypts and verifies
    /// the integrity trailer, and parses the secret fields.
    ///
    /// Usage 254 carries a SHA-1 trailer, everything else a two octet
    /// additive checksum; both cover the decrypted fields and fail with
    /// `ChecksumMismatch`.
    pub fn unlock(&self, passphrase: &str, alg: PublicKeyAlgorithm) -> Result<PlainSecretParams> {
        let s2k = match self.s2k {
            Some(ref s2k) => s2k.clone(),
            None => StringToKey::legacy_md5(),
        };
        let key = s2k.derive_key(passphrase, self.sym_alg.key_size())?;

        let mut plaintext = Zeroizing::new(self.data.to_vec());
        self.sym_alg
            .decrypt_cfb_with_iv(&key, &self.iv, &mut plaintext)?;

        let body = match self.usage {
            254 => {
                ensure!(plaintext.len() > 20, "missing sha1 trailer");
                let (body, hash) = plaintext.split_at(plaintext.len() - 20);
                let expected = checksum::calculate_sha1(body)?;
                if hash != expected {
                    return Err(ChecksumMismatchSnafu.build());
                }
                body
            }
            _ => {
                ensure!(plaintext.len() > 2, "missing checksum");
                let (body, cs) = plaintext.split_at(plaintext.len() - 2);
                checksum::simple([cs[0], cs[1]], body)?;
                body
            }
        };

        PlainSecretParams::try_from_buf(&mut &body[..], alg)
    }
}

impl Serialize for EncryptedSecretParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.usage])?;

        match self.usage {
            254 | 255 => {
                let s2k = self
                    .s2k
                    .as_ref()
                    .expect("s2k usage 254/255 carries a specifier");
                writer.write_all(&[u8::from(self.sym_alg)])?;
                s2k.to_writer(writer)?;
            }
            _ => {
                // legacy: the usage octet is the symmetric algorithm id
                debug_assert_eq!(self.usage, u8::from(self.sym_alg));
            }
        }

        writer.write_all(&self.iv)?;
        writer.write_all(&self.data)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        let mut sum = 1;
        if matches!(self.usage, 254 | 255) {
            sum += 1;
            sum += self
                .s2k
                .as_ref()
                .expect("s2k usage 254/255 carries a specifier")
                .write_len();
        }
        sum += self.iv.len();
        sum += self.data.len();
        sum
    }
}

impl std::fmt::Debug for EncryptedSecretParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedSecretParams")
            .field("data", &hex::encode(&self.data))
            .field("iv", &hex::encode(&self.iv))
            .field("sym_alg", &self.sym_alg)
            .field("s2k", &self.s2k)
            .field("usage", &self.usage)
            .finish()
    }
}
