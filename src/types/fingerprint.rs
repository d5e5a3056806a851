use crate::types::KeyId;

/// A version 4 key fingerprint: the SHA-1 digest over the public key body.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-12.2>
#[derive(Clone, Copy, Eq, PartialEq, Hash, derive_more::Debug, derive_more::Display)]
#[display("{}", hex::encode(_0))]
pub struct Fingerprint(#[debug("{}", hex::encode(_0))] [u8; 20]);

impl Fingerprint {
    pub fn new(fp: [u8; 20]) -> Self {
        Fingerprint(fp)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The key id is the low 64 bits of the fingerprint.
    pub fn key_id(&self) -> KeyId {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[12..]);
        id.into()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_id_is_the_low_64_bits() {
        let fp = Fingerprint::new([
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
        ]);
        assert_eq!(
            fp.key_id().as_ref(),
            &[12, 13, 14, 15, 16, 17, 18, 19][..]
        );
        assert_eq!(fp.len(), 20);
    }
}
