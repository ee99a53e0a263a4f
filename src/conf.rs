//! Radio configuration applied by [`Cc1101::init`](crate::Cc1101::init)
//!
//! The CC1101 keeps no configuration across power cycles or SRES, so the
//! whole set is written on every init.

use crate::registers::{
    AddressCheck, CcaMode, IsmBand, LengthConfig, Modulation, PacketFormat, PreambleLength,
    SyncMode, TxOffMode,
};

/// Radio parameters in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Band preset: carrier frequency and PA table
    pub band: IsmBand,
    /// Channel number
    pub channel: u8,
    /// Data rate in kBaud
    pub baud_kbaud: f64,
    /// Receiver channel filter bandwidth in kHz
    pub bandwidth_khz: u16,
    /// FSK frequency deviation in kHz
    pub deviation_khz: f64,
    /// Modulation format
    pub modulation: Modulation,
    /// Sync word qualifier mode
    pub sync_mode: SyncMode,
    /// Sync word
    pub sync_word: u16,
    /// Manchester encoding
    pub manchester: bool,
    /// Minimum preamble length
    pub preamble: PreambleLength,
    /// Clear channel assessment mode
    pub cca_mode: CcaMode,
    /// State after TX
    pub txoff_mode: TxOffMode,
    /// Data whitening
    pub white_data: bool,
    /// RX/TX data path
    pub packet_format: PacketFormat,
    /// CRC calculation and check
    pub crc: bool,
    /// Packet length configuration
    pub length_config: LengthConfig,
    /// Device address
    pub address: u8,
    /// Address check on received packets
    pub address_check: AddressCheck,
    /// Append RSSI and LQI to received packets
    pub append_status: bool,
    /// Output power in dBm
    pub power_dbm: i8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            band: IsmBand::Default,
            channel: 0,
            baud_kbaud: 1.0,
            bandwidth_khz: 102,
            deviation_khz: 20.0,
            modulation: Modulation::Fsk2,
            sync_mode: SyncMode::None,
            sync_word: 0xD391,
            manchester: false,
            preamble: PreambleLength::Bytes2,
            cca_mode: CcaMode::Always,
            txoff_mode: TxOffMode::Idle,
            white_data: false,
            packet_format: PacketFormat::Normal,
            crc: false,
            length_config: LengthConfig::Variable,
            address: 0,
            address_check: AddressCheck::Disabled,
            append_status: false,
            power_dbm: 0,
        }
    }
}
