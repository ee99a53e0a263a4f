//! Frequency synthesizer registers
//!
//! - Carrier frequency word (FREQ2, FREQ1, FREQ0)
//! - Channel number (CHANNR)
//!
//! The carrier is `f_carrier = f_xosc / 2^16 * FREQ`, offset by the channel
//! number times the channel spacing configured in MDMCFG1/MDMCFG0.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::ConfigRegister;
use crate::{convert, Error};

/// Frequency control word (addresses: 0x0D..=0x0F)
///
/// Three consecutive registers, most significant byte first, accessed with a
/// single burst transaction.
///
/// # Important Notes
/// - Only 300-348, 387-464 and 779-928 MHz are usable
/// - The synthesizer should be recalibrated (SCAL or auto-calibration) after
///   a change
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Frequency {
    /// FREQ2, FREQ1, FREQ0
    pub word: [u8; 3],
}

impl Frequency {
    /// Encodes a carrier frequency in MHz.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - frequency outside the supported bands
    pub fn from_mhz(mhz: f64) -> Result<Self, Error> {
        convert::frequency_to_registers(mhz).map(|word| Self { word })
    }

    /// Carrier frequency in MHz
    pub fn mhz(&self) -> f64 {
        convert::registers_to_frequency(self.word)
    }
}

impl Default for Frequency {
    /// Reset value, ~800 MHz
    fn default() -> Self {
        Self {
            word: [0x1E, 0xC4, 0xEC],
        }
    }
}

/// Channel number register (address: 0x0A)
///
/// Multiplied by the channel spacing and added to the base frequency.
#[register(0x0Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct ChannelNumber {
    /// 8-bit unsigned channel number
    pub channel: u8,
}

impl ConfigRegister for Frequency {}
impl ConfigRegister for ChannelNumber {}

impl FromByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { word: bytes })
    }
}

impl ToByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.word)
    }
}

impl FromByteArray for ChannelNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { channel: bytes[0] })
    }
}

impl ToByteArray for ChannelNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.channel])
    }
}
