use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, Bytes};
use num_bigint::BigUint;

use crate::errors::{InvalidArgumentSnafu, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;

/// Represents an owned MPI value: a two-octet big-endian bit count followed
/// by the big-endian magnitude.
///
/// The stored magnitude carries no leading zero octets, so the value is ready
/// to be serialized as is.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-3.2>
#[derive(Default, Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Mpi(#[debug("{}", hex::encode(_0))] Bytes);

impl Mpi {
    /// Represent the data in `raw` as an Mpi.
    /// Note that `raw` is not expected to be length-prefixed.
    ///
    /// Strips leading zeros.
    pub fn from_slice(raw: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(strip_leading_zeros(raw)))
    }

    /// Parses a length-prefixed MPI from the given buffer.
    ///
    /// The declared bit length is an upper bound: a leading octet carrying a
    /// bit above the declared length is rejected, a stream shorter than the
    /// declared length is rejected.
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let len_bits = i.read_be_u16()?;
        let len_bytes = (usize::from(len_bits) + 7) >> 3;

        let n = i.read_take(len_bytes)?;

        if len_bits > 0 {
            // number of bits used in the leading octet
            let used = u32::from((len_bits - 1) % 8) + 1;
            ensure!(
                u32::from(n[0]) >> used == 0,
                "mpi with a bit set above the declared length of {} bits",
                len_bits
            );
        }

        let stripped = match n.iter().position(|b| *b != 0) {
            Some(offset) => n.slice(offset..),
            None => Bytes::new(),
        };

        Ok(Mpi(stripped))
    }

    /// The length of the magnitude in octets, without leading zeros.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl From<BigUint> for Mpi {
    fn from(other: BigUint) -> Self {
        Mpi::from_slice(&other.to_bytes_be())
    }
}

impl From<&BigUint> for Mpi {
    fn from(other: &BigUint) -> Self {
        Mpi::from_slice(&other.to_bytes_be())
    }
}

impl AsRef<[u8]> for Mpi {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// Returns the bit length of the given magnitude.
#[inline]
fn bit_size(val: &[u8]) -> usize {
    if val.is_empty() {
        0
    } else {
        (val.len() * 8) - val[0].leading_zeros() as usize
    }
}

#[inline]
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|b| b != &0) {
        Some(offset) => &bytes[offset..],
        None => &[],
    }
}

impl Serialize for Mpi {
    fn to_writer<W: io::Write>(&self, w: &mut W) -> Result<()> {
        let size = bit_size(&self.0);
        if size > usize::from(u16::MAX) {
            return Err(InvalidArgumentSnafu {
                message: format!("mpi magnitude of {size} bits exceeds the representable maximum"),
            }
            .build());
        }

        w.write_u16::<BigEndian>(size as u16)?;
        w.write_all(&self.0)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        2 + self.0.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use proptest::prelude::*;

    use super::*;

    impl Arbitrary for Mpi {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            proptest::collection::vec(0u8..255, 1..500)
                .prop_map(|v| Mpi::from_slice(&v))
                .boxed()
        }
    }

    #[test]
    fn test_mpi_decode() {
        // Decode the number `1`.
        assert_eq!(
            Mpi::try_from_buf(&mut &[0x00, 0x01, 0x01][..]).unwrap(),
            Mpi::from_slice(&[0x01])
        );

        // Decode the number `511` (`0x1FF` in hex).
        assert_eq!(
            Mpi::try_from_buf(&mut &[0x00, 0x09, 0x01, 0xFF][..]).unwrap(),
            Mpi::from_slice(&[0x01, 0xFF])
        );

        // A declared length of zero is the empty magnitude.
        let zero = Mpi::try_from_buf(&mut &[0x00, 0x00][..]).unwrap();
        assert!(zero.is_empty());
    }

    #[test]
    fn test_mpi_decode_rejects_overlong() {
        // declared 8 bits, but 9 are set
        assert!(Mpi::try_from_buf(&mut &[0x00, 0x08, 0x01, 0xFF][..]).is_err());
        // declared 1 bit, but 2 are set
        assert!(Mpi::try_from_buf(&mut &[0x00, 0x01, 0x03][..]).is_err());
        // shorter than declared
        assert!(Mpi::try_from_buf(&mut &[0x00, 0x11, 0x01][..]).is_err());
    }

    #[test]
    fn test_mpi_decode_tolerates_leading_zeros() {
        let m = Mpi::try_from_buf(&mut &[0x00, 0x09, 0x00, 0xFF][..]).unwrap();
        assert_eq!(m, Mpi::from_slice(&[0xFF]));
    }

    #[test]
    fn test_mpi_encode() {
        let mut buf = Vec::new();
        Mpi::from_slice(&[0x01, 0xFF]).to_writer(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x09, 0x01, 0xFF]);

        // leading zeros are not part of the encoding
        let mut buf = Vec::new();
        Mpi::from_slice(&[0x00, 0x00, 0x01, 0xFF])
            .to_writer(&mut buf)
            .unwrap();
        assert_eq!(buf, vec![0x00, 0x09, 0x01, 0xFF]);
    }

    #[test]
    fn test_biguint_conversion() {
        let m = Mpi::from_slice(&[0x01, 0xFF]);
        assert_eq!(m.to_biguint(), BigUint::from(511u32));
        assert_eq!(Mpi::from(BigUint::from(511u32)), m);
    }

    proptest! {
        #[test]
        fn mpi_write_len(m: Mpi) {
            let mut buf = Vec::new();
            m.to_writer(&mut buf)?;
            prop_assert_eq!(m.write_len(), buf.len());
        }

        #[test]
        fn mpi_roundtrip(m: Mpi) {
            let mut buf = Vec::new();
            m.to_writer(&mut buf)?;
            let back = Mpi::try_from_buf(&mut &buf[..])?;
            prop_assert_eq!(m, back);
        }
    }
}
