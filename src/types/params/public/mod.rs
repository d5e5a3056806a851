mod dsa;
mod elgamal;
mod rsa;

use std::io;

use bytes::Buf;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::ser::Serialize;

pub use self::dsa::DsaPublicParams;
pub use self::elgamal::ElgamalPublicParams;
pub use self::rsa::RsaPublicParams;

/// The algorithm specific public key material of a key packet.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PublicParams {
    RSA(RsaPublicParams),
    DSA(DsaPublicParams),
    Elgamal(ElgamalPublicParams),
}

impl PublicParams {
    /// Parses the algorithm specific fields of a public key packet.
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, mut i: B) -> Result<Self> {
        match alg {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                RsaPublicParams::try_from_buf(&mut i).map(PublicParams::RSA)
            }
            PublicKeyAlgorithm::DSA => DsaPublicParams::try_from_buf(&mut i).map(PublicParams::DSA),
            PublicKeyAlgorithm::ElgamalEncrypt | PublicKeyAlgorithm::Elgamal => {
                ElgamalPublicParams::try_from_buf(&mut i).map(PublicParams::Elgamal)
            }
            PublicKeyAlgorithm::ECDH
            | PublicKeyAlgorithm::ECDSA
            | PublicKeyAlgorithm::DiffieHellman => {
                unsupported_err!("public key algorithm {:?}", alg)
            }
            PublicKeyAlgorithm::Private100
            | PublicKeyAlgorithm::Private101
            | PublicKeyAlgorithm::Private102
            | PublicKeyAlgorithm::Private103
            | PublicKeyAlgorithm::Private104
            | PublicKeyAlgorithm::Private105
            | PublicKeyAlgorithm::Private106
            | PublicKeyAlgorithm::Private107
            | PublicKeyAlgorithm::Private108
            | PublicKeyAlgorithm::Private109
            | PublicKeyAlgorithm::Private110 => {
                unsupported_err!("private/experimental public key algorithm {:?}", alg)
            }
            PublicKeyAlgorithm::Unknown(id) => {
                bail!("unknown public key algorithm id {} (known ids: 1-3, 16-21, 100-110)", id)
            }
        }
    }

    /// The algorithm this key material belongs to, as far as it is decidable.
    ///
    /// RSA and Elgamal material is shared between multiple algorithm ids; the
    /// returned value is the primary id.
    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match self {
            PublicParams::RSA(_) => PublicKeyAlgorithm::RSA,
            PublicParams::DSA(_) => PublicKeyAlgorithm::DSA,
            PublicParams::Elgamal(_) => PublicKeyAlgorithm::ElgamalEncrypt,
        }
    }
}

impl Serialize for PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PublicParams::RSA(params) => params.to_writer(writer),
            PublicParams::DSA(params) => params.to_writer(writer),
            PublicParams::Elgamal(params) => params.to_writer(writer),
        }
    }

    fn write_len(&self) -> usize {
        match self {
            PublicParams::RSA(params) => params.write_len(),
            PublicParams::DSA(params) => params.write_len(),
            PublicParams::Elgamal(params) => params.write_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::Error;
    use crate::types::Mpi;

    #[test]
    fn params_roundtrip() {
        let params = PublicParams::Elgamal(ElgamalPublicParams::new(
            Mpi::from_slice(&[0x0B]),
            Mpi::from_slice(&[0x02]),
            Mpi::from_slice(&[0x07]),
        ));

        let buf = params.to_bytes().unwrap();
        assert_eq!(buf.len(), params.write_len());

        let back =
            PublicParams::try_from_buf(PublicKeyAlgorithm::ElgamalEncrypt, &mut &buf[..]).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn unsupported_and_unknown_algorithms() {
        let empty: &[u8] = &[];
        assert!(matches!(
            PublicParams::try_from_buf(PublicKeyAlgorithm::ECDH, empty),
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            PublicParams::try_from_buf(PublicKeyAlgorithm::Private109, empty),
            Err(Error::Unsupported { .. })
        ));

        let err = PublicParams::try_from_buf(PublicKeyAlgorithm::Unknown(77), empty).unwrap_err();
        assert!(err.to_string().contains("77"));
    }
}
