use aes::{Aes128, Aes192, Aes256};
use cfb_mode::{cipher::KeyIvInit, BufDecryptor, BufEncryptor};
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;

/// Available symmetric key algorithms.
///
/// The whole RFC 4880 registry is recognized, but only the AES family is
/// implemented; everything else is rejected as unsupported when used.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-9.2>
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SymmetricKeyAlgorithm {
    /// Plaintext or unencrypted data
    Plaintext = 0,
    IDEA = 1,
    /// TripleDES (DES-EDE, 168 bit key derived from 192)
    TripleDES = 2,
    /// CAST5 (128 bit key, as per [RFC2144])
    CAST5 = 3,
    /// Blowfish (128 bit key, 16 rounds)
    Blowfish = 4,
    AES128 = 7,
    AES192 = 8,
    AES256 = 9,
    /// Twofish with 256-bit key [TWOFISH]
    Twofish = 10,

    Private100 = 100,
    Private101 = 101,
    Private102 = 102,
    Private103 = 103,
    Private104 = 104,
    Private105 = 105,
    Private106 = 106,
    Private107 = 107,
    Private108 = 108,
    Private109 = 109,
    Private110 = 110,

    #[num_enum(catch_all)]
    Other(u8),
}

impl Default for SymmetricKeyAlgorithm {
    fn default() -> Self {
        Self::AES256
    }
}

impl SymmetricKeyAlgorithm {
    /// Looks up a registered symmetric key algorithm id, rejecting ids
    /// outside of the registry.
    pub fn try_lookup(id: u8) -> Result<Self> {
        match Self::from(id) {
            Self::Other(id) => {
                bail!("unknown symmetric key algorithm id {} (known ids: 0-10, 100-110)", id)
            }
            alg => Ok(alg),
        }
    }

    /// The size of a single block in bytes.
    pub fn block_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA
            | SymmetricKeyAlgorithm::TripleDES
            | SymmetricKeyAlgorithm::CAST5
            | SymmetricKeyAlgorithm::Blowfish => 8,
            SymmetricKeyAlgorithm::AES128
            | SymmetricKeyAlgorithm::AES192
            | SymmetricKeyAlgorithm::AES256
            | SymmetricKeyAlgorithm::Twofish => 16,
            _ => 0,
        }
    }

    /// The size of the key in bytes.
    pub fn key_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA => 16,
            SymmetricKeyAlgorithm::TripleDES => 24,
            SymmetricKeyAlgorithm::CAST5 => 16,
            SymmetricKeyAlgorithm::Blowfish => 16,
            SymmetricKeyAlgorithm::AES128 => 16,
            SymmetricKeyAlgorithm::AES192 => 24,
            SymmetricKeyAlgorithm::AES256 => 32,
            SymmetricKeyAlgorithm::Twofish => 32,
            _ => 0,
        }
    }

    /// Encrypts the buffer in place with CFB mode and an all-zero IV, the
    /// form used by v1 integrity protected data. The CFB register runs across
    /// the entire buffer, there is no resynchronization.
    pub fn encrypt_cfb(self, key: &[u8], plaintext: &mut [u8]) -> Result<()> {
        let iv = vec![0u8; self.block_size()];
        self.encrypt_cfb_with_iv(key, &iv, plaintext)
    }

    /// Decrypts the buffer in place with CFB mode and an all-zero IV.
    pub fn decrypt_cfb(self, key: &[u8], ciphertext: &mut [u8]) -> Result<()> {
        let iv = vec![0u8; self.block_size()];
        self.decrypt_cfb_with_iv(key, &iv, ciphertext)
    }

    /// Encrypts the buffer in place with plain CFB mode.
    pub fn encrypt_cfb_with_iv(self, key: &[u8], iv: &[u8], plaintext: &mut [u8]) -> Result<()> {
        match self {
            SymmetricKeyAlgorithm::AES128 => {
                BufEncryptor::<Aes128>::new_from_slices(key, iv)?.encrypt(plaintext);
            }
            SymmetricKeyAlgorithm::AES192 => {
                BufEncryptor::<Aes192>::new_from_slices(key, iv)?.encrypt(plaintext);
            }
            SymmetricKeyAlgorithm::AES256 => {
                BufEncryptor::<Aes256>::new_from_slices(key, iv)?.encrypt(plaintext);
            }
            _ => unsupported_err!("symmetric key algorithm {:?} for encryption", self),
        }
        Ok(())
    }

    /// Decrypts the buffer in place with plain CFB mode.
    pub fn decrypt_cfb_with_iv(self, key: &[u8], iv: &[u8], ciphertext: &mut [u8]) -> Result<()> {
        match self {
            SymmetricKeyAlgorithm::AES128 => {
                BufDecryptor::<Aes128>::new_from_slices(key, iv)?.decrypt(ciphertext);
            }
            SymmetricKeyAlgorithm::AES192 => {
                BufDecryptor::<Aes192>::new_from_slices(key, iv)?.decrypt(ciphertext);
            }
            SymmetricKeyAlgorithm::AES256 => {
                BufDecryptor::<Aes256>::new_from_slices(key, iv)?.decrypt(ciphertext);
            }
            _ => unsupported_err!("symmetric key algorithm {:?} for decryption", self),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::Error;

    macro_rules! roundtrip {
        ($name:ident, $alg:path) => {
            #[test]
            fn $name() {
                let data = vec![2u8; 256];
                let key = vec![1u8; $alg.key_size()];

                let mut ciphertext = data.clone();
                $alg.encrypt_cfb(&key, &mut ciphertext).unwrap();
                assert_ne!(data, ciphertext);

                let mut plaintext = ciphertext.clone();
                $alg.decrypt_cfb(&key, &mut plaintext).unwrap();
                assert_eq!(data, plaintext);
            }
        };
    }

    roundtrip!(roundtrip_aes128, SymmetricKeyAlgorithm::AES128);
    roundtrip!(roundtrip_aes192, SymmetricKeyAlgorithm::AES192);
    roundtrip!(roundtrip_aes256, SymmetricKeyAlgorithm::AES256);

    #[test]
    fn non_aes_is_unsupported() {
        let mut data = vec![0u8; 32];
        let err = SymmetricKeyAlgorithm::Twofish
            .encrypt_cfb(&[0u8; 32], &mut data)
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn bad_key_size_is_rejected() {
        let mut data = vec![0u8; 32];
        let err = SymmetricKeyAlgorithm::AES128
            .encrypt_cfb(&[0u8; 7], &mut data)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn cfb_is_length_preserving() {
        let key = vec![1u8; 16];
        for len in [0usize, 1, 15, 16, 17, 255] {
            let mut data = vec![3u8; len];
            SymmetricKeyAlgorithm::AES128
                .encrypt_cfb(&key, &mut data)
                .unwrap();
            assert_eq!(data.len(), len);
        }
    }
}
