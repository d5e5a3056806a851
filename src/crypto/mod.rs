pub mod checksum;
pub mod elgamal;
pub mod hash;
pub mod pkcs1;
pub mod public_key;
pub mod sym;
