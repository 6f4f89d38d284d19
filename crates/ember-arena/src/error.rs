//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request, including alignment padding, does not fit.
    OutOfMemory {
        /// Number of bytes requested (excluding padding).
        requested: usize,
        /// Bytes remaining before the request.
        available: usize,
    },
    /// Alignment is zero, not a power of two, or above
    /// [`ArenaConfig::MAX_ALIGNMENT`](crate::ArenaConfig::MAX_ALIGNMENT).
    InvalidAlignment {
        /// The rejected alignment.
        alignment: usize,
    },
    /// The arena configuration failed validation.
    InvalidConfig {
        /// Description of the violated invariant.
        reason: String,
    },
    /// A handle does not lie within the allocated region.
    HandleOutOfBounds {
        /// Start of the handle.
        offset: usize,
        /// Length of the handle.
        len: usize,
        /// Bytes allocated so far.
        used: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                available,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes, {available} bytes available"
                )
            }
            Self::InvalidAlignment { alignment } => {
                write!(f, "invalid alignment: {alignment}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::HandleOutOfBounds { offset, len, used } => {
                write!(
                    f,
                    "handle [{offset}, +{len}) outside allocated region of {used} bytes"
                )
            }
        }
    }
}

impl Error for ArenaError {}
