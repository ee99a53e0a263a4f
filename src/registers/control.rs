//! Radio control registers
//!
//! - Main radio control state machine, CCA and exit modes (MCSM1)
//! - AGC carrier sense thresholds and filter length (AGCCTRL1, AGCCTRL0)
//! - Front end TX configuration, PA table index (FREND0)

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::map::Address;
use super::{ConfigRegister, Field, InvalidValue};
use crate::Error;

field_enum! {
    /// Clear channel indication mode (MCSM1 bits 5:4)
    pub enum CcaMode {
        /// Always clear
        Always = 0,
        /// Clear if RSSI is below threshold
        RssiBelowThreshold = 1,
        /// Clear unless currently receiving a packet
        UnlessReceiving = 2,
        /// Clear if RSSI is below threshold and not receiving a packet
        RssiBelowThresholdUnlessReceiving = 3,
    }
}

field_enum! {
    /// State entered after a packet has been received (MCSM1 bits 3:2)
    pub enum RxOffMode {
        /// IDLE
        Idle = 0,
        /// FSTXON
        Fstxon = 1,
        /// TX
        Tx = 2,
        /// Stay in RX
        StayInRx = 3,
    }
}

field_enum! {
    /// State entered after a packet has been sent (MCSM1 bits 1:0)
    pub enum TxOffMode {
        /// IDLE
        Idle = 0,
        /// FSTXON
        Fstxon = 1,
        /// Stay in TX, start sending preamble
        StayInTx = 2,
        /// RX
        Rx = 3,
    }
}

field_enum! {
    /// Carrier sense threshold relative to the RSSI floor (AGCCTRL1 bits 5:4)
    pub enum CarrierSenseThreshold {
        /// Relative carrier sense disabled
        Disabled = 0,
        /// 6 dB increase in RSSI
        Db6 = 1,
        /// 10 dB increase in RSSI
        Db10 = 2,
        /// 14 dB increase in RSSI
        Db14 = 3,
    }
}

field_enum! {
    /// Channel filter samples averaged by the AGC (AGCCTRL0 bits 1:0)
    ///
    /// For OOK/ASK this selects the decision boundary instead
    /// (4, 8, 12 and 16 dB).
    pub enum FilterLength {
        /// 8 samples
        Samples8 = 0,
        /// 16 samples
        Samples16 = 1,
        /// 32 samples
        Samples32 = 2,
        /// 64 samples
        Samples64 = 3,
    }
}

/// Main radio control state machine configuration 1 (address: 0x17)
#[register(0x17u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct StateMachineConfig1 {
    /// Clear channel assessment mode
    pub cca_mode: CcaMode,
    /// Exit state after RX
    pub rxoff_mode: RxOffMode,
    /// Exit state after TX
    pub txoff_mode: TxOffMode,
}

impl Default for StateMachineConfig1 {
    fn default() -> Self {
        Self {
            cca_mode: CcaMode::RssiBelowThresholdUnlessReceiving,
            rxoff_mode: RxOffMode::Idle,
            txoff_mode: TxOffMode::Idle,
        }
    }
}

/// AGC control 1 (address: 0x1C)
#[register(0x1Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcControl1 {
    /// LNA 2 gain is decreased to minimum before decreasing LNA gain
    pub lna_priority: bool,
    /// Relative carrier sense threshold
    pub carrier_sense_relative: CarrierSenseThreshold,
    /// Absolute carrier sense threshold, 4-bit two's complement in dB
    pub carrier_sense_absolute: u8,
}

/// AGC control 0 (address: 0x1D)
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AgcControl0 {
    /// HYST_LEVEL, 2 bits
    pub hysteresis: u8,
    /// WAIT_TIME, 2 bits
    pub wait_time: u8,
    /// AGC_FREEZE, 2 bits
    pub freeze: u8,
    /// FILTER_LENGTH
    pub filter_length: FilterLength,
}

/// Front end TX configuration (address: 0x22)
///
/// `pa_power` indexes the PA table. With ASK/OOK the PA ramps between
/// index 0 and this index.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrontEndTx {
    /// LODIV_BUF_CURRENT_TX, 2 bits
    pub lodiv_buf_current: u8,
    /// PA_POWER, 3 bits
    pub pa_power: u8,
}

impl Default for FrontEndTx {
    fn default() -> Self {
        Self {
            lodiv_buf_current: 1,
            pa_power: 0,
        }
    }
}

impl StateMachineConfig1 {
    /// CCA_MODE, bits 5:4
    pub const CCA_MODE: Field = Field::new(Address::Mcsm1, 2, 4);
    /// RXOFF_MODE, bits 3:2
    pub const RXOFF_MODE: Field = Field::new(Address::Mcsm1, 2, 2);
    /// TXOFF_MODE, bits 1:0
    pub const TXOFF_MODE: Field = Field::new(Address::Mcsm1, 2, 0);
}

impl AgcControl1 {
    /// AGC_LNA_PRIORITY, bit 6
    pub const LNA_PRIORITY: Field = Field::new(Address::Agcctrl1, 1, 6);
    /// CARRIER_SENSE_REL_THR, bits 5:4
    pub const CARRIER_SENSE_RELATIVE: Field = Field::new(Address::Agcctrl1, 2, 4);
    /// CARRIER_SENSE_ABS_THR, bits 3:0
    pub const CARRIER_SENSE_ABSOLUTE: Field = Field::new(Address::Agcctrl1, 4, 0);
}

impl AgcControl0 {
    /// HYST_LEVEL, bits 7:6
    pub const HYSTERESIS: Field = Field::new(Address::Agcctrl0, 2, 6);
    /// WAIT_TIME, bits 5:4
    pub const WAIT_TIME: Field = Field::new(Address::Agcctrl0, 2, 4);
    /// AGC_FREEZE, bits 3:2
    pub const FREEZE: Field = Field::new(Address::Agcctrl0, 2, 2);
    /// FILTER_LENGTH, bits 1:0
    pub const FILTER_LENGTH: Field = Field::new(Address::Agcctrl0, 2, 0);
}

impl FrontEndTx {
    /// LODIV_BUF_CURRENT_TX, bits 5:4
    pub const LODIV_BUF_CURRENT: Field = Field::new(Address::Frend0, 2, 4);
    /// PA_POWER, bits 2:0
    pub const PA_POWER: Field = Field::new(Address::Frend0, 3, 0);
}

impl ConfigRegister for StateMachineConfig1 {}
impl ConfigRegister for AgcControl1 {}
impl ConfigRegister for AgcControl0 {}
impl ConfigRegister for FrontEndTx {}

impl FromByteArray for StateMachineConfig1 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            cca_mode: CcaMode::try_from(Self::CCA_MODE.get(bytes[0]))?,
            rxoff_mode: RxOffMode::try_from(Self::RXOFF_MODE.get(bytes[0]))?,
            txoff_mode: TxOffMode::try_from(Self::TXOFF_MODE.get(bytes[0]))?,
        })
    }
}

impl ToByteArray for StateMachineConfig1 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::CCA_MODE.set(0, self.cca_mode.into())?;
        let byte = Self::RXOFF_MODE.set(byte, self.rxoff_mode.into())?;
        Ok([Self::TXOFF_MODE.set(byte, self.txoff_mode.into())?])
    }
}

impl FromByteArray for AgcControl1 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            lna_priority: Self::LNA_PRIORITY.get(bytes[0]) != 0,
            carrier_sense_relative: CarrierSenseThreshold::try_from(
                Self::CARRIER_SENSE_RELATIVE.get(bytes[0]),
            )?,
            carrier_sense_absolute: Self::CARRIER_SENSE_ABSOLUTE.get(bytes[0]),
        })
    }
}

impl ToByteArray for AgcControl1 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::LNA_PRIORITY.set(0, self.lna_priority.into())?;
        let byte = Self::CARRIER_SENSE_RELATIVE.set(byte, self.carrier_sense_relative.into())?;
        Ok([Self::CARRIER_SENSE_ABSOLUTE.set(byte, self.carrier_sense_absolute)?])
    }
}

impl FromByteArray for AgcControl0 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            hysteresis: Self::HYSTERESIS.get(bytes[0]),
            wait_time: Self::WAIT_TIME.get(bytes[0]),
            freeze: Self::FREEZE.get(bytes[0]),
            filter_length: FilterLength::try_from(Self::FILTER_LENGTH.get(bytes[0]))?,
        })
    }
}

impl ToByteArray for AgcControl0 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::HYSTERESIS.set(0, self.hysteresis)?;
        let byte = Self::WAIT_TIME.set(byte, self.wait_time)?;
        let byte = Self::FREEZE.set(byte, self.freeze)?;
        Ok([Self::FILTER_LENGTH.set(byte, self.filter_length.into())?])
    }
}

impl FromByteArray for FrontEndTx {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            lodiv_buf_current: Self::LODIV_BUF_CURRENT.get(bytes[0]),
            pa_power: Self::PA_POWER.get(bytes[0]),
        })
    }
}

impl ToByteArray for FrontEndTx {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::LODIV_BUF_CURRENT.set(0, self.lodiv_buf_current)?;
        Ok([Self::PA_POWER.set(byte, self.pa_power)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcsm1_reset_value() {
        assert_eq!(
            StateMachineConfig1::from_bytes([0x30]),
            Ok(StateMachineConfig1::default())
        );
    }

    #[test]
    fn mcsm1_fields_do_not_overlap() {
        let reg = StateMachineConfig1 {
            cca_mode: CcaMode::Always,
            rxoff_mode: RxOffMode::StayInRx,
            txoff_mode: TxOffMode::Rx,
        };
        assert_eq!(reg.to_bytes(), Ok([0x0F]));
    }

    #[test]
    fn agc_control_round_trip() {
        let agc1 = AgcControl1::from_bytes([0x68]).unwrap();
        assert!(agc1.lna_priority);
        assert_eq!(agc1.carrier_sense_relative, CarrierSenseThreshold::Db10);
        assert_eq!(agc1.carrier_sense_absolute, 0x08);
        assert_eq!(agc1.to_bytes(), Ok([0x68]));

        let agc0 = AgcControl0::from_bytes([0x91]).unwrap();
        assert_eq!((agc0.hysteresis, agc0.wait_time, agc0.freeze), (2, 1, 0));
        assert_eq!(agc0.filter_length, FilterLength::Samples16);
        assert_eq!(agc0.to_bytes(), Ok([0x91]));
    }

    #[test]
    fn frend0_default_matches_reset_value() {
        assert_eq!(FrontEndTx::default().to_bytes(), Ok([0x10]));
    }

    #[test]
    fn pa_index_beyond_the_table_is_rejected() {
        let reg = FrontEndTx {
            lodiv_buf_current: 1,
            pa_power: 9,
        };
        assert_eq!(reg.to_bytes(), Err(Error::InvalidArgument));
    }
}
