use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;

/// Available compression algorithms.
///
/// This crate keeps the registry but never decompresses packet payloads;
/// values 100 to 110 are private or experimental placeholders.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-9.3>
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CompressionAlgorithm {
    Uncompressed = 0,
    ZIP = 1,
    ZLIB = 2,
    BZip2 = 3,

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

impl CompressionAlgorithm {
    /// Looks up a registered compression algorithm id, rejecting ids outside
    /// of the registry.
    pub fn try_lookup(id: u8) -> Result<Self> {
        match Self::from(id) {
            Self::Other(id) => {
                bail!("unknown compression algorithm id {} (known ids: 0-3, 100-110)", id)
            }
            alg => Ok(alg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry() {
        assert_eq!(CompressionAlgorithm::try_lookup(2).unwrap(), CompressionAlgorithm::ZLIB);
        assert_eq!(
            CompressionAlgorithm::try_lookup(105).unwrap(),
            CompressionAlgorithm::Private105
        );
        assert!(CompressionAlgorithm::try_lookup(42).is_err());
    }
}
