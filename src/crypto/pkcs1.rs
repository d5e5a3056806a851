//! EME-PKCS1-v1_5 message encoding, as used for wrapping session keys.
//!
//! Ref: <https://datatracker.ietf.org/doc/html/rfc8017#section-7.2.1>

use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::errors::{Error, InvalidArgumentSnafu, Result};

/// Encodes `msg` into an encryption block of `k` octets:
/// `0x00 0x02 PS 0x00 msg`, where `PS` consists of at least eight non-zero
/// random octets.
pub fn eme_encode<R: CryptoRng + Rng>(
    mut rng: R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if msg.len() + 11 > k {
        return Err(InvalidArgumentSnafu {
            message: format!(
                "message of {} octets is too long for a {} octet modulus",
                msg.len(),
                k
            ),
        }
        .build());
    }

    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 0x02;

    let ps_len = k - msg.len() - 3;
    for slot in em[2..2 + ps_len].iter_mut() {
        // PS must not contain zero octets
        loop {
            let b = rng.gen::<u8>();
            if b != 0 {
                *slot = b;
                break;
            }
        }
    }

    em[k - msg.len()..].copy_from_slice(msg);

    Ok(em)
}

/// Strips the EME-PKCS1-v1_5 encoding from a decrypted block.
///
/// Every malformation (wrong leading octets, missing zero separator, short
/// padding string) maps to the same opaque [`Error::PaddingError`].
pub fn eme_decode(em: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if em.len() < 11 || em[0] != 0x00 || em[1] != 0x02 {
        return Err(Error::PaddingError);
    }

    let ps_len = em[2..]
        .iter()
        .position(|b| *b == 0)
        .ok_or(Error::PaddingError)?;
    if ps_len < 8 {
        return Err(Error::PaddingError);
    }

    Ok(Zeroizing::new(em[2 + ps_len + 1..].to_vec()))
}
