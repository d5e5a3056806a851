use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;

/// Available public key algorithms.
///
/// Values 100 to 110 are reserved for private or experimental use and carry
/// no semantics.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-9.1>
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt and Sign)
    RSA = 1,
    /// DEPRECATED: RSA (Encrypt-Only)
    RSAEncrypt = 2,
    /// DEPRECATED: RSA (Sign-Only)
    RSASign = 3,
    /// Elgamal (Encrypt-Only)
    ElgamalEncrypt = 16,
    /// DSA (Digital Signature Algorithm)
    DSA = 17,
    /// Reserved for Elliptic Curve
    ECDH = 18,
    /// Reserved for ECDSA
    ECDSA = 19,
    /// DEPRECATED: Elgamal (Encrypt and Sign)
    Elgamal = 20,
    /// Reserved for Diffie-Hellman (X9.42, as defined for IETF-S/MIME)
    DiffieHellman = 21,

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
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    /// Looks up a registered public key algorithm id, rejecting ids outside
    /// of the registry.
    pub fn try_lookup(id: u8) -> Result<Self> {
        match Self::from(id) {
            Self::Unknown(id) => {
                bail!("unknown public key algorithm id {} (known ids: 1-3, 16-21, 100-110)", id)
            }
            alg => Ok(alg),
        }
    }

    /// Is this one of the Elgamal encryption algorithm ids?
    pub fn is_elgamal(self) -> bool {
        matches!(self, Self::ElgamalEncrypt | Self::Elgamal)
    }
}
