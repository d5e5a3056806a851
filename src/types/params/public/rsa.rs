use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// RSA public key material: modulus `n` and public exponent `e`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RsaPublicParams {
    n: Mpi,
    e: Mpi,
}

impl RsaPublicParams {
    pub fn new(n: Mpi, e: Mpi) -> Self {
        RsaPublicParams { n, e }
    }

    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let n = Mpi::try_from_buf(&mut i)?;
        let e = Mpi::try_from_buf(&mut i)?;

        Ok(RsaPublicParams { n, e })
    }

    pub fn n(&self) -> &Mpi {
        &self.n
    }

    pub fn e(&self) -> &Mpi {
        &self.e
    }
}

impl Serialize for RsaPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.n.to_writer(writer)?;
        self.e.to_writer(writer)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.n.write_len() + self.e.write_len()
    }
}
