use std::io;

use bytes::Buf;
use rand::{CryptoRng, Rng};
use zeroize::ZeroizeOnDrop;

use crate::crypto::checksum;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::{Mpi, StringToKey};

use super::EncryptedSecretParams;

/// Decrypted (or never encrypted) secret key material.
///
/// The magnitudes are stored raw and zeroed on drop.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop, derive_more::Debug)]
pub enum PlainSecretParams {
    RSA {
        #[debug("..")]
        d: Vec<u8>,
        #[debug("..")]
        p: Vec<u8>,
        #[debug("..")]
        q: Vec<u8>,
        #[debug("..")]
        u: Vec<u8>,
    },
    DSA {
        #[debug("..")]
        x: Vec<u8>,
    },
    Elgamal {
        #[debug("..")]
        x: Vec<u8>,
    },
}

impl PlainSecretParams {
    /// Parses the algorithm specific secret fields, without any checksum.
    pub fn try_from_buf<B: Buf>(mut i: B, alg: PublicKeyAlgorithm) -> Result<Self> {
        let params = match alg {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                // MPI of RSA secret exponent d
                let d = Mpi::try_from_buf(&mut i)?;
                // MPI of RSA secret prime value p
                let p = Mpi::try_from_buf(&mut i)?;
                // MPI of RSA secret prime value q (p < q)
                let q = Mpi::try_from_buf(&mut i)?;
                // MPI of u, the multiplicative inverse of p, mod q
                let u = Mpi::try_from_buf(&mut i)?;

                PlainSecretParams::RSA {
                    d: d.as_bytes().to_vec(),
                    p: p.as_bytes().to_vec(),
                    q: q.as_bytes().to_vec(),
                    u: u.as_bytes().to_vec(),
                }
            }
            PublicKeyAlgorithm::DSA => {
                // MPI of DSA secret exponent x
                let x = Mpi::try_from_buf(&mut i)?;
                PlainSecretParams::DSA {
                    x: x.as_bytes().to_vec(),
                }
            }
            PublicKeyAlgorithm::ElgamalEncrypt | PublicKeyAlgorithm::Elgamal => {
                // MPI of Elgamal secret exponent x
                let x = Mpi::try_from_buf(&mut i)?;
                PlainSecretParams::Elgamal {
                    x: x.as_bytes().to_vec(),
                }
            }
            _ => {
                unsupported_err!("secret key material for algorithm {:?}", alg);
            }
        };

        ensure!(
            !i.has_remaining(),
            "failed to process full secret key material"
        );

        Ok(params)
    }

    /// Writes the raw algorithm specific fields, without any checksum.
    pub fn to_writer_raw<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PlainSecretParams::RSA { d, p, q, u } => {
                Mpi::from_slice(d).to_writer(writer)?;
                Mpi::from_slice(p).to_writer(writer)?;
                Mpi::from_slice(q).to_writer(writer)?;
                Mpi::from_slice(u).to_writer(writer)?;
            }
            PlainSecretParams::DSA { x } => {
                Mpi::from_slice(x).to_writer(writer)?;
            }
            PlainSecretParams::Elgamal { x } => {
                Mpi::from_slice(x).to_writer(writer)?;
            }
        }
        Ok(())
    }

    pub fn write_len_raw(&self) -> usize {
        match self {
            PlainSecretParams::RSA { d, p, q, u } => {
                Mpi::from_slice(d).write_len()
                    + Mpi::from_slice(p).write_len()
                    + Mpi::from_slice(q).write_len()
                    + Mpi::from_slice(u).write_len()
            }
            PlainSecretParams::DSA { x } => Mpi::from_slice(x).write_len(),
            PlainSecretParams::Elgamal { x } => Mpi::from_slice(x).write_len(),
        }
    }

    /// The two octet additive checksum over the raw fields.
    pub fn checksum_simple(&self) -> [u8; 2] {
        let mut buf = Vec::with_capacity(self.write_len_raw());
        self.to_writer_raw(&mut buf).expect("known write target");
        checksum::calculate_simple(&buf).to_be_bytes()
    }

    /// The SHA-1 trailer over the raw fields, as used by s2k usage 254.
    pub fn checksum_sha1(&self) -> Result<[u8; 20]> {
        let mut buf = Vec::with_capacity(self.write_len_raw());
        self.to_writer_raw(&mut buf).expect("known write target");
        checksum::calculate_sha1(&buf)
    }

    /// Encrypts this material under the given passphrase (s2k usage 254:
    /// CFB with a fresh IV, SHA-1 trailer inside the ciphertext).
    pub fn encrypt<R: CryptoRng + Rng>(
        &self,
        mut rng: R,
        passphrase: &str,
        s2k: StringToKey,
        sym_alg: SymmetricKeyAlgorithm,
    ) -> Result<EncryptedSecretParams> {
        let key = s2k.derive_key(passphrase, sym_alg.key_size())?;

        let mut iv = vec![0u8; sym_alg.block_size()];
        rng.fill_bytes(&mut iv);

        let mut data = Vec::with_capacity(self.write_len_raw() + 20);
        self.to_writer_raw(&mut data).expect("preallocated vector");
        data.extend_from_slice(&self.checksum_sha1()?[..]);

        sym_alg.encrypt_cfb_with_iv(&key, &iv, &mut data)?;

        Ok(EncryptedSecretParams::new_protected(
            data.into(),
            iv.into(),
            sym_alg,
            s2k,
        ))
    }
}

impl Serialize for PlainSecretParams {
    /// The unencrypted wire form: raw fields followed by the two octet
    /// checksum.
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.to_writer_raw(writer)?;
        writer.write_all(&self.checksum_simple())?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.write_len_raw() + 2
    }
}
