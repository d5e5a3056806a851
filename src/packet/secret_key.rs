use std::io;

use bytes::Buf;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::crypto::sym::SymmetricKeyAlgorithm;
use crate::crypto::{checksum, elgamal};
use crate::errors::Result;
use crate::packet::public_key::PubKeyInner;
use crate::packet::{PacketHeader, PacketTrait, PublicKey, PublicKeyEncryptedSessionKey};
use crate::ser::Serialize;
use crate::types::{
    Fingerprint, KeyId, KeyVersion, PkeskBytes, PlainSecretParams, PublicParams, SecretParams, Tag,
};

/// Secret Key Packet (version 4)
///
/// The public key body followed by the s2k usage octet and the (possibly
/// passphrase protected) secret material.
///
/// Ref: <https://tools.ietf.org/html/rfc4880#section-5.5.1.3>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SecretKey {
    packet_header: PacketHeader,
    details: PubKeyInner,
    secret_params: SecretParams,
}

impl SecretKey {
    /// Creates a new `SecretKey` packet from a public key and secret
    /// material.
    pub fn new(public: PublicKey, secret_params: SecretParams) -> Self {
        let details = public.into_inner();
        let len = details.write_len() + secret_params.write_len();
        let packet_header = PacketHeader::new_fixed(Tag::SecretKey, len as u32);

        SecretKey {
            packet_header,
            details,
            secret_params,
        }
    }

    /// Parses a `SecretKey` packet from the given buf.
    pub fn from_buf<B: Buf>(packet_header: PacketHeader, mut input: B) -> Result<Self> {
        ensure_eq!(packet_header.tag(), Tag::SecretKey, "invalid tag");

        let details = PubKeyInner::try_from_buf(&mut input)?;
        let secret_params = SecretParams::try_from_buf(&mut input, details.algorithm())?;

        Ok(SecretKey {
            packet_header,
            details,
            secret_params,
        })
    }

    pub fn version(&self) -> KeyVersion {
        KeyVersion::V4
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.details.algorithm()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.details.created_at()
    }

    pub fn public_params(&self) -> &PublicParams {
        self.details.public_params()
    }

    pub fn secret_params(&self) -> &SecretParams {
        &self.secret_params
    }

    pub fn is_encrypted(&self) -> bool {
        self.secret_params.is_encrypted()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.details.fingerprint()
    }

    pub fn key_id(&self) -> KeyId {
        self.details.key_id()
    }

    /// Decrypts the secret material with the given passphrase.
    ///
    /// Returns a copy of this key carrying plaintext material. For keys that
    /// are not passphrase protected this is a clone.
    pub fn unlock(&self, passphrase: &str) -> Result<SecretKey> {
        let plain = match &self.secret_params {
            SecretParams::Plain(k) => k.clone(),
            SecretParams::Encrypted(k) => k.unlock(passphrase, self.details.algorithm())?,
        };

        Ok(SecretKey {
            packet_header: self.packet_header,
            details: self.details.clone(),
            secret_params: SecretParams::Plain(plain),
        })
    }

    /// Recovers the session key from a PKESK addressed to this key.
    ///
    /// The secret material must be unlocked. The wrapped blob is
    /// `algorithm || session key || checksum`; the checksum is verified
    /// before anything is returned.
    pub fn unwrap_session_key(
        &self,
        pkesk: &PublicKeyEncryptedSessionKey,
    ) -> Result<(SymmetricKeyAlgorithm, Zeroizing<Vec<u8>>)> {
        if !pkesk.id().is_wildcard() {
            ensure!(
                *pkesk.id() == self.key_id(),
                "session key is addressed to key {:x}, not to this key",
                pkesk.id()
            );
        }

        let SecretParams::Plain(ref plain) = self.secret_params else {
            bail!("secret key material is locked; unlock it first");
        };

        let decrypted = match (plain, self.details.public_params(), pkesk.values()) {
            (
                PlainSecretParams::Elgamal { x },
                PublicParams::Elgamal(params),
                PkeskBytes::Elgamal { first, second },
            ) => elgamal::decrypt(x, params, first, second)?,
            (PlainSecretParams::RSA { .. }, _, _) => {
                unsupported_err!("session key unwrap for RSA")
            }
            (PlainSecretParams::DSA { .. }, _, _) => {
                bail!("DSA is only used for signing")
            }
            _ => bail!("inconsistent key state"),
        };

        // decrypted is `u8(alg) || key || u16(checksum)`
        ensure!(decrypted.len() > 3, "wrapped session key is too short");

        let alg = SymmetricKeyAlgorithm::try_lookup(decrypted[0])?;
        let (key, cs) = decrypted[1..].split_at(decrypted.len() - 3);
        checksum::simple([cs[0], cs[1]], key)?;

        ensure!(
            key.len() == alg.key_size(),
            "invalid session key length {} for {:?}",
            key.len(),
            alg
        );

        Ok((alg, Zeroizing::new(key.to_vec())))
    }
}

impl Serialize for SecretKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.details.to_writer(writer)?;
        self.secret_params.to_writer(writer)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.details.write_len() + self.secret_params.write_len()
    }
}

impl PacketTrait for SecretKey {
    fn packet_header(&self) -> &PacketHeader {
        &self.packet_header
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::TimeZone;

    use super::*;
    use crate::errors::Error;
    use crate::types::{ElgamalPublicParams, Mpi};

    fn test_key() -> SecretKey {
        let params = PublicParams::Elgamal(ElgamalPublicParams::new(
            Mpi::from_slice(&[0xEB]),
            Mpi::from_slice(&[0x02]),
            Mpi::from_slice(&[0x51]),
        ));
        let created_at = Utc.timestamp_opt(1_400_000_000, 0).single().unwrap();
        let public =
            PublicKey::new(PublicKeyAlgorithm::ElgamalEncrypt, created_at, params).unwrap();

        SecretKey::new(
            public,
            SecretParams::Plain(PlainSecretParams::Elgamal {
                x: b"exponent".to_vec(),
            }),
        )
    }

    #[test]
    fn roundtrip() {
        let key = test_key();
        let buf = key.to_bytes().unwrap();
        assert_eq!(buf.len(), key.write_len());

        let back = SecretKey::from_buf(*key.packet_header(), &mut &buf[..]).unwrap();
        assert_eq!(key, back);
        assert!(!back.is_encrypted());
    }

    #[test]
    fn usage_zero_checksum_is_verified() {
        let key = test_key();
        let mut buf = key.to_bytes().unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;

        let err = SecretKey::from_buf(*key.packet_header(), &mut &buf[..]).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn fingerprint_matches_the_public_half() {
        let key = test_key();
        assert_eq!(key.key_id(), key.fingerprint().key_id());
    }
}
