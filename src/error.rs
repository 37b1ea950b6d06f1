//! Unified error types for the PetFeeder firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the service and logged without allocation.
//!
//! None of these are fatal once the control loop is running: the loop logs
//! them and keeps sensing motion and driving the indicator.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A target-animal value outside the accepted vocabulary.
    InvalidTarget,
    /// The serial link failed to read or write.
    Link(LinkError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget => write!(f, "invalid target animal (expected CAT or DOG)"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The UART driver reported a read failure.
    ReadFailed,
    /// The UART driver accepted fewer bytes than the line length.
    WriteFailed,
    /// The outbound line did not fit the formatting buffer.
    LineTooLong,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "UART read failed"),
            Self::WriteFailed => write!(f, "UART write failed"),
            Self::LineTooLong => write!(f, "line exceeds buffer"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
