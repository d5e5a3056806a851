use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// Elgamal public key material.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ElgamalPublicParams {
    p: Mpi,
    g: Mpi,
    y: Mpi,
}

impl ElgamalPublicParams {
    pub fn new(p: Mpi, g: Mpi, y: Mpi) -> Self {
        ElgamalPublicParams { p, g, y }
    }

    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        // MPI of Elgamal prime p
        let p = Mpi::try_from_buf(&mut i)?;
        // MPI of Elgamal group generator g
        let g = Mpi::try_from_buf(&mut i)?;
        // MPI of Elgamal public key value y (= g**x mod p where x is secret)
        let y = Mpi::try_from_buf(&mut i)?;

        Ok(ElgamalPublicParams { p, g, y })
    }

    pub fn p(&self) -> &Mpi {
        &self.p
    }

    pub fn g(&self) -> &Mpi {
        &self.g
    }

    pub fn y(&self) -> &Mpi {
        &self.y
    }
}

impl Serialize for ElgamalPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.p.to_writer(writer)?;
        self.g.to_writer(writer)?;
        self.y.to_writer(writer)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.p.write_len() + self.g.write_len() + self.y.write_len()
    }
}
