use std::num::TryFromIntError;

use snafu::{Backtrace, Snafu};

use crate::types::Tag;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// Input that does not follow the packet grammar: unreadable framing,
    /// truncation, ill-formed MPIs, wrong packet versions, unknown algorithm
    /// ids in required slots.
    #[snafu(display("malformed input: {message}"))]
    Malformed {
        message: String,
        backtrace: Option<Backtrace>,
    },
    /// Recognized, but not implemented.
    #[snafu(display("unsupported: {message}"))]
    Unsupported {
        message: String,
        backtrace: Option<Backtrace>,
    },
    #[snafu(display("invalid argument: {message}"))]
    InvalidArgument {
        message: String,
        backtrace: Option<Backtrace>,
    },
    /// A two-octet additive checksum or a SHA-1 trailer did not match.
    #[snafu(display("checksum mismatch"))]
    ChecksumMismatch { backtrace: Option<Backtrace> },
    /// Quick-check or MDC failure for integrity protected data.
    ///
    /// Deliberately carries no detail about which of the two checks failed.
    #[snafu(display("integrity check failed"))]
    IntegrityCheckFailed,
    /// EME-PKCS1-v1_5 decoding failure. Deliberately opaque.
    #[snafu(display("padding error"))]
    PaddingError,
    #[snafu(display("SHA1 hash collision detected"))]
    Sha1HashCollision,
    /// Decoding the body of a framed packet failed.
    #[snafu(display("invalid packet {tag:?}"))]
    InvalidPacketContent { tag: Tag, source: Box<Error> },
    #[snafu(display("IO error: {source}"), context(false))]
    IO {
        source: std::io::Error,
        backtrace: Option<Backtrace>,
    },
    #[snafu(transparent)]
    TryFromInt {
        source: TryFromIntError,
        backtrace: Option<Backtrace>,
    },
}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Error {
        Error::InvalidArgument {
            message: "invalid key or iv length".to_string(),
            backtrace: Some(snafu::GenerateImplicitData::generate()),
        }
    }
}

#[macro_export]
macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported {
            message: $e.to_string(),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported {
            message: format!($fmt, $($arg)+),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        })
    };
}

#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Malformed {
            message: $e.to_string(),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Malformed {
            message: format!($fmt, $($arg)+),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        })
    };
}

#[macro_export]
macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Malformed {
            message: $e.to_string(),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Malformed {
            message: format!($fmt, $($arg)+),
            backtrace: ::snafu::GenerateImplicitData::generate(),
        }
    };
}

#[macro_export(local_inner_macros)]
macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            bail!($e);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            bail!($fmt, $($arg)+);
        }
    };
}

#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr) => ({
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#, left_val, right_val)
                }
            }
        }
    });
    ($left:expr, $right:expr,) => ({
        ensure_eq!($left, $right)
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, left_val, right_val,
                           format_args!($($arg)+))
                }
            }
        }
    });
}
