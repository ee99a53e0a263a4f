//! Driver error type
//!
//! Every fallible operation in this crate returns [`Error`]. Bus and pin
//! failures are reduced to the `embedded-hal` error kinds at the point where
//! the transaction fails, so the error stays `Copy` and independent of the
//! concrete HAL.

use core::convert::Infallible;
use core::fmt;

/// Errors reported by the CC1101 driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An SPI transaction failed
    Bus(embedded_hal::spi::ErrorKind),
    /// Reading or driving one of the GDO lines failed
    Pin(embedded_hal::digital::ErrorKind),
    /// A physical value lies outside the range the chip can represent
    InvalidParameter,
    /// A value does not fit the bit field it is packed into
    InvalidArgument,
    /// A bounded wait ran out of iterations
    Timeout,
    /// A register byte did not decode into a known value
    Deserialization,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(kind) => write!(f, "SPI bus error: {kind:?}"),
            Self::Pin(kind) => write!(f, "GDO pin error: {kind:?}"),
            Self::InvalidParameter => f.write_str("parameter out of range"),
            Self::InvalidArgument => f.write_str("value does not fit its register field"),
            Self::Timeout => f.write_str("timed out waiting for the radio"),
            Self::Deserialization => f.write_str("unexpected register value"),
        }
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl Error {
    pub(crate) fn bus<E: embedded_hal::spi::Error>(err: E) -> Self {
        Self::Bus(err.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}
