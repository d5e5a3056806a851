use std::io;

use bytes::Buf;
use num_enum::{FromPrimitive, IntoPrimitive};
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::crypto::hash::HashAlgorithm;
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;

const EXPBIAS: u32 = 6;

/// String-To-Key specifier: how a passphrase is turned into key material.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-3.7>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringToKey {
    typ: StringToKeyType,
    hash: HashAlgorithm,
    salt: Option<[u8; 8]>,
    count: Option<u8>,
}

impl StringToKey {
    pub fn new_default<R: CryptoRng + Rng>(rng: R) -> Self {
        StringToKey::new_iterated(rng, HashAlgorithm::default(), 224)
    }

    pub fn new_iterated<R: CryptoRng + Rng>(mut rng: R, hash: HashAlgorithm, count: u8) -> Self {
        let mut salt = [0u8; 8];
        rng.fill(&mut salt[..]);

        StringToKey {
            typ: StringToKeyType::IteratedAndSalted,
            hash,
            salt: Some(salt),
            count: Some(count),
        }
    }

    pub fn new_salted<R: CryptoRng + Rng>(mut rng: R, hash: HashAlgorithm) -> Self {
        let mut salt = [0u8; 8];
        rng.fill(&mut salt[..]);

        StringToKey {
            typ: StringToKeyType::Salted,
            hash,
            salt: Some(salt),
            count: None,
        }
    }

    pub fn new_simple(hash: HashAlgorithm) -> Self {
        StringToKey {
            typ: StringToKeyType::Simple,
            hash,
            salt: None,
            count: None,
        }
    }

    /// The implicit specifier of legacy secret keys that store a symmetric
    /// algorithm id directly in the s2k usage octet.
    pub(crate) fn legacy_md5() -> Self {
        Self::new_simple(HashAlgorithm::MD5)
    }

    /// Converts the coded count into the octet count.
    /// Ref: <https://tools.ietf.org/html/rfc4880#section-3.7.1.3>
    pub fn count(&self) -> Option<usize> {
        self.count
            .map(|c| ((16u32 + u32::from(c & 15)) << (u32::from(c >> 4) + EXPBIAS)) as usize)
    }

    pub fn salt(&self) -> Option<&[u8]> {
        self.salt.as_ref().map(|salt| &salt[..])
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn typ(&self) -> StringToKeyType {
        self.typ
    }

    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let typ = StringToKeyType::from(i.read_u8()?);
        match typ {
            StringToKeyType::Simple | StringToKeyType::Salted | StringToKeyType::IteratedAndSalted => {}
            StringToKeyType::Reserved => bail!("reserved string-to-key type 2"),
            StringToKeyType::Other(id) => {
                bail!("unknown string-to-key type {} (known types: 0, 1, 3)", id)
            }
            _ => unsupported_err!("string-to-key type {:?}", typ),
        }

        let hash = HashAlgorithm::try_lookup(i.read_u8()?)?;

        let salt = match typ {
            StringToKeyType::Salted | StringToKeyType::IteratedAndSalted => {
                Some(i.read_array::<8>()?)
            }
            _ => None,
        };
        let count = match typ {
            StringToKeyType::IteratedAndSalted => Some(i.read_u8()?),
            _ => None,
        };

        Ok(StringToKey {
            typ,
            hash,
            salt,
            count,
        })
    }

    /// Derives `key_size` octets of key material from the given passphrase.
    ///
    /// When the digest is shorter than `key_size`, multiple hash contexts are
    /// run in parallel, each preloaded with one more zero octet than the one
    /// before, and their outputs concatenated left to right.
    ///
    /// Ref: <https://tools.ietf.org/html/rfc4880#section-3.7.1>
    pub fn derive_key(&self, passphrase: &str, key_size: usize) -> Result<Zeroizing<Vec<u8>>> {
        let digest_size = self.hash.digest_size();
        ensure!(digest_size > 0, "s2k hash {:?} has no digest", self.hash);
        let rounds = key_size.div_ceil(digest_size);

        let mut key = Zeroizing::new(Vec::with_capacity(key_size));

        for round in 0..rounds {
            let mut hasher = self.hash.new_hasher()?;

            if round > 0 {
                hasher.update(&vec![0u8; round][..]);
            }

            match self.typ {
                StringToKeyType::Simple => {
                    hasher.update(passphrase.as_bytes());
                }
                StringToKeyType::Salted => {
                    hasher.update(self.salt.as_ref().expect("salted has a salt"));
                    hasher.update(passphrase.as_bytes());
                }
                StringToKeyType::IteratedAndSalted => {
                    let salt = self.salt.expect("iterated has a salt");
                    let mut block =
                        Zeroizing::new(Vec::with_capacity(salt.len() + passphrase.len()));
                    block.extend_from_slice(&salt);
                    block.extend_from_slice(passphrase.as_bytes());

                    // feed `salt || passphrase` repeatedly until the coded
                    // count is reached, truncating the final repetition;
                    // short counts still hash one whole block
                    let total = self.count().expect("iterated has a count").max(block.len());
                    let whole_passes = total / block.len();
                    let partial = total % block.len();

                    for _ in 0..whole_passes {
                        hasher.update(&block);
                    }
                    hasher.update(&block[..partial]);
                }
                _ => unsupported_err!("s2k type {:?} cannot derive keys", self.typ),
            }

            let digest = hasher.finish();
            let needed = key_size - key.len();
            key.extend_from_slice(&digest[..needed.min(digest.len())]);
        }

        Ok(key)
    }
}

impl Serialize for StringToKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[u8::from(self.typ), u8::from(self.hash)])?;

        if let Some(ref salt) = self.salt {
            writer.write_all(salt)?;
        }

        if let Some(count) = self.count {
            writer.write_all(&[count])?;
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        let mut sum = 2;
        if self.salt.is_some() {
            sum += 8;
        }
        if self.count.is_some() {
            sum += 1;
        }
        sum
    }
}

/// Available String-To-Key types.
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum StringToKeyType {
    Simple = 0,
    Salted = 1,
    Reserved = 2,
    IteratedAndSalted = 3,

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

impl Default for StringToKeyType {
    fn default() -> Self {
        Self::IteratedAndSalted
    }
}
