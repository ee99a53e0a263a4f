//! Modem configuration registers
//!
//! This module contains the registers that shape the over-the-air signal:
//! - Channel filter bandwidth and data rate (MDMCFG4, MDMCFG3)
//! - Modulation format, Manchester coding and sync word qualifier (MDMCFG2)
//! - FEC, preamble length and channel spacing exponent (MDMCFG1)
//! - Frequency deviation (DEVIATN)
//!
//! Data rate, bandwidth and deviation are exponent/mantissa encodings; see
//! [`crate::convert`] for the arithmetic.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::map::Address;
use super::{ConfigRegister, Field, InvalidValue};
use crate::Error;

field_enum! {
    /// Modulation format (MDMCFG2 bits 6:4)
    pub enum Modulation {
        /// 2-FSK
        Fsk2 = 0,
        /// Gaussian shaped 2-FSK
        Gfsk = 1,
        /// ASK / OOK
        AskOok = 3,
        /// 4-FSK
        Fsk4 = 4,
        /// Minimum shift keying, only above 26 kBaud
        Msk = 7,
    }
}

field_enum! {
    /// Combined sync word qualifier mode (MDMCFG2 bits 2:0)
    pub enum SyncMode {
        /// No preamble/sync
        None = 0,
        /// 15 of 16 sync word bits detected
        Bits15Of16 = 1,
        /// 16 of 16 sync word bits detected
        Bits16Of16 = 2,
        /// 30 of 32 sync word bits detected
        Bits30Of32 = 3,
        /// No preamble/sync, carrier sense above threshold
        CarrierSense = 4,
        /// 15 of 16 plus carrier sense above threshold
        Bits15Of16CarrierSense = 5,
        /// 16 of 16 plus carrier sense above threshold
        Bits16Of16CarrierSense = 6,
        /// 30 of 32 plus carrier sense above threshold
        Bits30Of32CarrierSense = 7,
    }
}

field_enum! {
    /// Minimum number of preamble bytes transmitted (MDMCFG1 bits 6:4)
    pub enum PreambleLength {
        /// 2 bytes
        Bytes2 = 0,
        /// 3 bytes
        Bytes3 = 1,
        /// 4 bytes
        Bytes4 = 2,
        /// 6 bytes
        Bytes6 = 3,
        /// 8 bytes
        Bytes8 = 4,
        /// 12 bytes
        Bytes12 = 5,
        /// 16 bytes
        Bytes16 = 6,
        /// 24 bytes
        Bytes24 = 7,
    }
}

/// Modem configuration 4 (address: 0x10)
///
/// Shared between the channel filter bandwidth (bits 7:4) and the data rate
/// exponent (bits 3:0). Setting one must preserve the other.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig4 {
    /// CHANBW_E, 2 bits
    pub bandwidth_exponent: u8,
    /// CHANBW_M, 2 bits
    pub bandwidth_mantissa: u8,
    /// DRATE_E, 4 bits
    pub data_rate_exponent: u8,
}

/// Modem configuration 3 (address: 0x11)
///
/// Data rate mantissa. The rate is
/// `(256 + DRATE_M) * 2^DRATE_E / 2^28 * f_xosc`.
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig3 {
    /// DRATE_M
    pub data_rate_mantissa: u8,
}

/// Modem configuration 2 (address: 0x12)
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig2 {
    /// Disable the digital DC blocking filter before the demodulator
    pub dc_filter_off: bool,
    /// Modulation format
    pub modulation: Modulation,
    /// Manchester encoding/decoding
    pub manchester: bool,
    /// Sync word qualifier mode
    pub sync_mode: SyncMode,
}

/// Modem configuration 1 (address: 0x13)
///
/// # Important Notes
/// - FEC is only supported with fixed packet length
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig1 {
    /// Forward error correction with interleaving
    pub fec: bool,
    /// Minimum preamble length
    pub preamble: PreambleLength,
    /// CHANSPC_E, 2 bits
    pub channel_spacing_exponent: u8,
}

/// Modem deviation setting (address: 0x15)
///
/// For 2-FSK/GFSK/4-FSK the deviation is
/// `f_xosc / 2^17 * (8 + DEVIATION_M) * 2^DEVIATION_E`. Ignored for ASK/OOK.
#[register(0x15u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Deviation {
    /// DEVIATION_E, 3 bits
    pub exponent: u8,
    /// DEVIATION_M, 3 bits
    pub mantissa: u8,
}

impl ModemConfig4 {
    /// CHANBW_E, bits 7:6
    pub const BANDWIDTH_EXPONENT: Field = Field::new(Address::Mdmcfg4, 2, 6);
    /// CHANBW_M, bits 5:4
    pub const BANDWIDTH_MANTISSA: Field = Field::new(Address::Mdmcfg4, 2, 4);
    /// DRATE_E, bits 3:0
    pub const DATA_RATE_EXPONENT: Field = Field::new(Address::Mdmcfg4, 4, 0);
}

impl ModemConfig2 {
    /// DEM_DCFILT_OFF, bit 7
    pub const DC_FILTER_OFF: Field = Field::new(Address::Mdmcfg2, 1, 7);
    /// MOD_FORMAT, bits 6:4
    pub const MODULATION: Field = Field::new(Address::Mdmcfg2, 3, 4);
    /// MANCHESTER_EN, bit 3
    pub const MANCHESTER: Field = Field::new(Address::Mdmcfg2, 1, 3);
    /// SYNC_MODE, bits 2:0
    pub const SYNC_MODE: Field = Field::new(Address::Mdmcfg2, 3, 0);
}

impl ModemConfig1 {
    /// FEC_EN, bit 7
    pub const FEC: Field = Field::new(Address::Mdmcfg1, 1, 7);
    /// NUM_PREAMBLE, bits 6:4
    pub const PREAMBLE: Field = Field::new(Address::Mdmcfg1, 3, 4);
    /// CHANSPC_E, bits 1:0
    pub const CHANNEL_SPACING_EXPONENT: Field = Field::new(Address::Mdmcfg1, 2, 0);
}

impl Deviation {
    /// DEVIATION_E, bits 6:4
    pub const EXPONENT: Field = Field::new(Address::Deviatn, 3, 4);
    /// DEVIATION_M, bits 2:0
    pub const MANTISSA: Field = Field::new(Address::Deviatn, 3, 0);
}

impl ConfigRegister for ModemConfig4 {}
impl ConfigRegister for ModemConfig3 {}
impl ConfigRegister for ModemConfig2 {}
impl ConfigRegister for ModemConfig1 {}
impl ConfigRegister for Deviation {}

impl FromByteArray for ModemConfig4 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            bandwidth_exponent: Self::BANDWIDTH_EXPONENT.get(bytes[0]),
            bandwidth_mantissa: Self::BANDWIDTH_MANTISSA.get(bytes[0]),
            data_rate_exponent: Self::DATA_RATE_EXPONENT.get(bytes[0]),
        })
    }
}

impl ToByteArray for ModemConfig4 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::BANDWIDTH_EXPONENT.set(0, self.bandwidth_exponent)?;
        let byte = Self::BANDWIDTH_MANTISSA.set(byte, self.bandwidth_mantissa)?;
        Ok([Self::DATA_RATE_EXPONENT.set(byte, self.data_rate_exponent)?])
    }
}

impl FromByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            data_rate_mantissa: bytes[0],
        })
    }
}

impl ToByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.data_rate_mantissa])
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            dc_filter_off: Self::DC_FILTER_OFF.get(bytes[0]) != 0,
            modulation: Modulation::try_from(Self::MODULATION.get(bytes[0]))?,
            manchester: Self::MANCHESTER.get(bytes[0]) != 0,
            sync_mode: SyncMode::try_from(Self::SYNC_MODE.get(bytes[0]))?,
        })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::DC_FILTER_OFF.set(0, self.dc_filter_off.into())?;
        let byte = Self::MODULATION.set(byte, self.modulation.into())?;
        let byte = Self::MANCHESTER.set(byte, self.manchester.into())?;
        Ok([Self::SYNC_MODE.set(byte, self.sync_mode.into())?])
    }
}

impl FromByteArray for ModemConfig1 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            fec: Self::FEC.get(bytes[0]) != 0,
            preamble: PreambleLength::try_from(Self::PREAMBLE.get(bytes[0]))?,
            channel_spacing_exponent: Self::CHANNEL_SPACING_EXPONENT.get(bytes[0]),
        })
    }
}

impl ToByteArray for ModemConfig1 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::FEC.set(0, self.fec.into())?;
        let byte = Self::PREAMBLE.set(byte, self.preamble.into())?;
        Ok([Self::CHANNEL_SPACING_EXPONENT.set(byte, self.channel_spacing_exponent)?])
    }
}

impl FromByteArray for Deviation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            exponent: Self::EXPONENT.get(bytes[0]),
            mantissa: Self::MANTISSA.get(bytes[0]),
        })
    }
}

impl ToByteArray for Deviation {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::EXPONENT.set(0, self.exponent)?;
        Ok([Self::MANTISSA.set(byte, self.mantissa)?])
    }
}
