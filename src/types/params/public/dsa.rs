use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// DSA public key material.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DsaPublicParams {
    p: Mpi,
    q: Mpi,
    g: Mpi,
    y: Mpi,
}

impl DsaPublicParams {
    pub fn new(p: Mpi, q: Mpi, g: Mpi, y: Mpi) -> Self {
        DsaPublicParams { p, q, g, y }
    }

    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        // MPI of DSA prime p
        let p = Mpi::try_from_buf(&mut i)?;
        // MPI of DSA group order q (q is a prime divisor of p-1)
        let q = Mpi::try_from_buf(&mut i)?;
        // MPI of DSA group generator g
        let g = Mpi::try_from_buf(&mut i)?;
        // MPI of DSA public-key value y (= g**x mod p where x is secret)
        let y = Mpi::try_from_buf(&mut i)?;

        Ok(DsaPublicParams { p, q, g, y })
    }

    pub fn p(&self) -> &Mpi {
        &self.p
    }

    pub fn q(&self) -> &Mpi {
        &self.q
    }

    pub fn g(&self) -> &Mpi {
        &self.g
    }

    pub fn y(&self) -> &Mpi {
        &self.y
    }
}

impl Serialize for DsaPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.p.to_writer(writer)?;
        self.q.to_writer(writer)?;
        self.g.to_writer(writer)?;
        self.y.to_writer(writer)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.p.write_len() + self.q.write_len() + self.g.write_len() + self.y.write_len()
    }
}
