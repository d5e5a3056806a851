use bytes::Bytes;
use chrono::{TimeZone, Utc};
use num_bigint::BigUint;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use pgp_core::errors::{Error, Result};
use pgp_core::crypto::public_key::PublicKeyAlgorithm;
use pgp_core::crypto::sym::SymmetricKeyAlgorithm;
use pgp_core::packet::{
    DataMode, LiteralData, Packet, PacketParser, PublicKey, PublicKeyEncryptedSessionKey,
    SecretKey, SymEncryptedProtectedData,
};
use pgp_core::ser::Serialize;
use pgp_core::types::{
    ElgamalPublicParams, Mpi, PlainSecretParams, PublicParams, SecretParams, StringToKey,
};

/// The 1024 bit MODP group from RFC 2409 §6.2, generator 2.
const P_HEX: &str = "ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f14374fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7edee386bfb5a899fa5ae9f24117c4b1fe649286651ece65381ffffffffffffffff";

/// A fixed Elgamal key pair over the MODP group.
fn elgamal_key_pair() -> (PublicKey, SecretKey) {
    let p = BigUint::from_bytes_be(&hex::decode(P_HEX).unwrap());
    let g = BigUint::from(2u32);
    let x = BigUint::from_bytes_be(b"an entirely deterministic test exponent");
    let y = g.modpow(&x, &p);

    let params = PublicParams::Elgamal(ElgamalPublicParams::new(
        Mpi::from(&p),
        Mpi::from(&g),
        Mpi::from(&y),
    ));
    let created_at = Utc.timestamp_opt(1_400_000_000, 0).single().unwrap();

    let public = PublicKey::new(PublicKeyAlgorithm::ElgamalEncrypt, created_at, params).unwrap();
    let secret = SecretKey::new(
        public.clone(),
        SecretParams::Plain(PlainSecretParams::Elgamal {
            x: x.to_bytes_be(),
        }),
    );

    (public, secret)
}

#[test]
fn wrap_and_unwrap_session_key() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let (public, secret) = elgamal_key_pair();

    let alg = SymmetricKeyAlgorithm::AES256;
    let mut session_key = vec![0u8; alg.key_size()];
    rng.fill_bytes(&mut session_key);

    let pkesk =
        PublicKeyEncryptedSessionKey::from_session_key(&mut rng, alg, &session_key, &public)
            .unwrap();
    assert_eq!(*pkesk.id(), public.key_id());

    // through the wire and back
    let bytes = Packet::from(pkesk).to_bytes().unwrap();
    let packets: Vec<_> = PacketParser::new(&bytes[..]).collect::<Result<_>>().unwrap();
    let Packet::PublicKeyEncryptedSessionKey(ref pkesk) = packets[0] else {
        panic!("expected a pkesk packet");
    };

    let (unwrapped_alg, unwrapped_key) = secret.unwrap_session_key(pkesk).unwrap();
    assert_eq!(unwrapped_alg, alg);
    assert_eq!(&unwrapped_key[..], &session_key[..]);

    // a session key addressed to a different key id is refused
    let mut foreign = bytes.clone();
    // layout: tag octet, two length octets, version octet, then the key id
    foreign[4] ^= 0xFF;
    let packets: Vec<_> = PacketParser::new(&foreign[..])
        .collect::<Result<_>>()
        .unwrap();
    let Packet::PublicKeyEncryptedSessionKey(ref foreign_pkesk) = packets[0] else {
        panic!("expected a pkesk packet");
    };
    assert!(secret.unwrap_session_key(foreign_pkesk).is_err());
}

#[test]
fn unwrap_rejects_locked_keys_and_foreign_ids() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let (public, secret) = elgamal_key_pair();

    let alg = SymmetricKeyAlgorithm::AES128;
    let session_key = vec![0x42u8; alg.key_size()];
    let pkesk =
        PublicKeyEncryptedSessionKey::from_session_key(&mut rng, alg, &session_key, &public)
            .unwrap();

    // lock the secret material, then try to unwrap
    let s2k = StringToKey::new_iterated(&mut rng, Default::default(), 224);
    let SecretParams::Plain(ref plain) = *secret.secret_params() else {
        panic!("fixture is plain");
    };
    let locked = SecretKey::new(
        public,
        SecretParams::Encrypted(
            plain
                .encrypt(&mut rng, "passphrase", s2k, SymmetricKeyAlgorithm::AES256)
                .unwrap(),
        ),
    );
    assert!(locked.is_encrypted());
    assert!(locked.unwrap_session_key(&pkesk).is_err());

    // unlocking restores the ability to unwrap
    let unlocked = locked.unlock("passphrase").unwrap();
    let (got_alg, got_key) = unlocked.unwrap_session_key(&pkesk).unwrap();
    assert_eq!(got_alg, alg);
    assert_eq!(&got_key[..], &session_key[..]);

    // wrong passphrase fails the sha1 trailer
    let err = locked.unlock("not the passphrase").unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
}

#[test]
fn secret_key_survives_the_wire_locked() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let (public, secret) = elgamal_key_pair();

    let SecretParams::Plain(ref plain) = *secret.secret_params() else {
        panic!("fixture is plain");
    };
    let s2k = StringToKey::new_iterated(&mut rng, Default::default(), 224);
    let locked = SecretKey::new(
        public,
        SecretParams::Encrypted(
            plain
                .encrypt(&mut rng, "hunter2", s2k, SymmetricKeyAlgorithm::AES128)
                .unwrap(),
        ),
    );

    let bytes = Packet::from(locked.clone()).to_bytes().unwrap();
    let packets: Vec<_> = PacketParser::new(&bytes[..]).collect::<Result<_>>().unwrap();
    let Packet::SecretKey(ref back) = packets[0] else {
        panic!("expected a secret key packet");
    };
    assert_eq!(back, &locked);

    let unlocked = back.unlock("hunter2").unwrap();
    assert_eq!(
        unlocked.secret_params(),
        secret.unlock("").unwrap().secret_params()
    );
}

#[test]
fn end_to_end_message() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let (public, secret) = elgamal_key_pair();

    // sender side: literal data, wrapped and encrypted
    let alg = SymmetricKeyAlgorithm::AES256;
    let mut session_key = vec![0u8; alg.key_size()];
    rng.fill_bytes(&mut session_key);

    let mtime = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
    let literal = LiteralData::with_mtime(
        "greeting.txt",
        Bytes::from_static(b"hello over an encrypted channel"),
        DataMode::Binary,
        mtime,
    );
    let payload = Packet::from(literal.clone()).to_bytes().unwrap();

    let pkesk =
        PublicKeyEncryptedSessionKey::from_session_key(&mut rng, alg, &session_key, &public)
            .unwrap();
    let seipd = SymEncryptedProtectedData::encrypt(&mut rng, alg, &session_key, &payload).unwrap();

    let mut message = Vec::new();
    Packet::from(pkesk).to_writer(&mut message).unwrap();
    Packet::from(seipd).to_writer(&mut message).unwrap();

    // receiver side
    let packets: Vec<_> = PacketParser::new(&message[..])
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(packets.len(), 2);

    let Packet::PublicKeyEncryptedSessionKey(ref pkesk) = packets[0] else {
        panic!("expected a pkesk packet");
    };
    let Packet::SymEncryptedProtectedData(ref seipd) = packets[1] else {
        panic!("expected an integrity protected packet");
    };

    let (alg, key) = secret.unwrap_session_key(pkesk).unwrap();
    let decrypted = seipd.decrypt(alg, &key).unwrap();

    let inner: Vec<_> = PacketParser::new(&decrypted[..])
        .collect::<Result<_>>()
        .unwrap();
    let Packet::LiteralData(ref back) = inner[0] else {
        panic!("expected literal data");
    };
    assert_eq!(back, &literal);

    // tampering with the ciphertext is detected
    let mut tampered = message.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    let packets: Vec<_> = PacketParser::new(&tampered[..])
        .collect::<Result<_>>()
        .unwrap();
    let Packet::SymEncryptedProtectedData(ref seipd) = packets[1] else {
        panic!("expected an integrity protected packet");
    };
    let err = seipd.decrypt(alg, &key).unwrap_err();
    assert!(matches!(err, Error::IntegrityCheckFailed));
}
