//! Elgamal encryption, the session key wrap of RFC 4880 public key
//! algorithms 16 and 20.

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::crypto::pkcs1;
use crate::errors::Result;
use crate::types::{ElgamalPublicParams, Mpi};

/// Encrypts `plain` to the recipient key `(p, g, y)`.
///
/// The plaintext is EME-PKCS1-v1_5 encoded to the octet length of `p`, then
/// encrypted with a fresh ephemeral exponent `x`, `1 < x < p - 1`:
/// `c1 = g^x mod p`, `c2 = m * y^x mod p`.
pub fn encrypt<R: CryptoRng + Rng>(
    mut rng: R,
    params: &ElgamalPublicParams,
    plain: &[u8],
) -> Result<(Mpi, Mpi)> {
    let p = params.p().to_biguint();
    let g = params.g().to_biguint();
    let y = params.y().to_biguint();

    // octet length of the modulus
    let k = params.p().len();
    let em = pkcs1::eme_encode(&mut rng, plain, k)?;
    let m = BigUint::from_bytes_be(&em);

    let one = BigUint::from(1u32);
    let two = BigUint::from(2u32);
    let upper = &p - &one;
    ensure!(two < upper, "elgamal modulus too small");

    // the ephemeral exponent is the only entropy in this step
    let x = rng.gen_biguint_range(&two, &upper);

    let c1 = g.modpow(&x, &p);
    let c2 = (m * y.modpow(&x, &p)) % &p;

    Ok((Mpi::from(c1), Mpi::from(c2)))
}

/// Decrypts an Elgamal ciphertext `(c1, c2)` with the secret exponent `x` and
/// strips the EME-PKCS1-v1_5 encoding.
///
/// The shared secret is eliminated as `c2 * c1^(p-1-x) mod p`, which keeps
/// modular exponentiation as the only big integer primitive.
pub fn decrypt(
    x: &[u8],
    params: &ElgamalPublicParams,
    first: &Mpi,
    second: &Mpi,
) -> Result<Zeroizing<Vec<u8>>> {
    let p = params.p().to_biguint();
    let k = params.p().len();

    let x = BigUint::from_bytes_be(x);
    let c1 = first.to_biguint();
    let c2 = second.to_biguint();

    let zero = BigUint::from(0u32);
    let one = BigUint::from(1u32);
    let p_minus_one = &p - &one;

    ensure!(
        x > zero && x < p_minus_one,
        "elgamal secret exponent out of range"
    );
    ensure!(
        c1 > zero && c1 < p && c2 < p,
        "elgamal ciphertext out of range"
    );

    let exp = &p_minus_one - &x;
    let s_inv = c1.modpow(&exp, &p);
    let m = (c2 * s_inv) % &p;

    let mb = m.to_bytes_be();
    ensure!(mb.len() <= k, "elgamal plaintext out of range");

    // left pad the block back to the modulus length
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[k - mb.len()..].copy_from_slice(&mb);

    pkcs1::eme_decode(&em)
}
