//! The two octet additive checksum used for session keys and secret key
//! material, plus the collision-detecting SHA-1 helper for protected secret
//! keys.

use crate::errors::{ChecksumMismatchSnafu, Error, Result};

/// Computes the two octet checksum: the sum of all octets mod 65536.
#[inline]
pub fn calculate_simple(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)))
}

/// Verifies a two octet big endian checksum against the given data.
#[inline]
pub fn simple(actual: [u8; 2], data: &[u8]) -> Result<()> {
    if actual != calculate_simple(data).to_be_bytes() {
        return Err(ChecksumMismatchSnafu.build());
    }

    Ok(())
}

/// SHA-1 over the given data, refusing inputs that carry a known collision
/// attack.
///
/// Fails with `Error::Sha1HashCollision` when a collision was detected.
pub fn calculate_sha1(data: &[u8]) -> Result<[u8; 20]> {
    use sha1_checked::{CollisionResult, Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(data);

    match hasher.try_finalize() {
        CollisionResult::Ok(digest) => Ok(digest.into()),
        CollisionResult::Collision(_) | CollisionResult::Mitigated(_) => {
            Err(Error::Sha1HashCollision)
        }
    }
}
