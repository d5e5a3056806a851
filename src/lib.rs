#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, rust_2018_idioms)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

#[macro_use]
pub mod errors;
pub mod crypto;
pub mod packet;
pub mod parsing;
pub mod parsing_reader;
pub mod ser;
pub mod types;

pub use self::packet::{Packet, PacketParser};

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
