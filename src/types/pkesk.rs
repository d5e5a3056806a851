use std::io;

use bytes::Buf;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// The algorithm specific values of a Public Key Encrypted Session Key
/// packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PkeskBytes {
    Rsa {
        mpi: Mpi,
    },
    /// Elgamal carries exactly two MPIs: `g^k mod p` and `m * y^k mod p`.
    Elgamal {
        first: Mpi,
        second: Mpi,
    },
}

impl PkeskBytes {
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, mut i: B) -> Result<Self> {
        match alg {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let mpi = Mpi::try_from_buf(&mut i)?;
                Ok(PkeskBytes::Rsa { mpi })
            }
            PublicKeyAlgorithm::ElgamalEncrypt | PublicKeyAlgorithm::Elgamal => {
                let first = Mpi::try_from_buf(&mut i)?;
                let second = Mpi::try_from_buf(&mut i)?;
                Ok(PkeskBytes::Elgamal { first, second })
            }
            _ => unsupported_err!("session key values for algorithm {:?}", alg),
        }
    }
}

impl Serialize for PkeskBytes {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PkeskBytes::Rsa { mpi } => {
                mpi.to_writer(writer)?;
            }
            PkeskBytes::Elgamal { first, second } => {
                first.to_writer(writer)?;
                second.to_writer(writer)?;
            }
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            PkeskBytes::Rsa { mpi } => mpi.write_len(),
            PkeskBytes::Elgamal { first, second } => first.write_len() + second.write_len(),
        }
    }
}
