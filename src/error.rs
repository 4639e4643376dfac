//! Errors reported by the driver
//!
//! Only pin failures are reported. An out of range cursor position is dropped,
//! and a display that stays busy is waited on for a bounded time, then the
//! driver carries on anyway.

use core::fmt;

use embedded_hal::digital::{self, ErrorKind};

/// A pin access failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// One of EN / RS / RW could not be driven
    ControlPin(ErrorKind),
    /// The 4 bit data bus could not be written, read, or turned around
    DataBus(ErrorKind),
}

impl Error {
    pub(crate) fn control<E: digital::Error>(err: E) -> Self {
        Error::ControlPin(err.kind())
    }

    pub(crate) fn bus<E: digital::Error>(err: E) -> Self {
        Error::DataBus(err.kind())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ControlPin(kind) => write!(f, "control pin error: {}", kind),
            Error::DataBus(kind) => write!(f, "data bus error: {}", kind),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::ControlPin(_) => defmt::write!(fmt, "control pin error"),
            Error::DataBus(_) => defmt::write!(fmt, "data bus error"),
        }
    }
}
