//! Packet handling registers
//!
//! This module contains the registers that frame a packet:
//! - Sync word (SYNC1, SYNC0)
//! - Packet length (PKTLEN)
//! - Preamble quality, status appending and address filtering (PKTCTRL1)
//! - Whitening, FIFO/serial format, CRC and length mode (PKTCTRL0)
//! - Device address (ADDR)
//!
//! In variable length mode the first byte after the sync word is the payload
//! length and PKTLEN is the largest length the receiver accepts.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use super::map::Address;
use super::{ConfigRegister, Field, InvalidValue};
use crate::Error;

field_enum! {
    /// Address check applied to received packets (PKTCTRL1 bits 1:0)
    pub enum AddressCheck {
        /// No address check
        Disabled = 0,
        /// Address check, no broadcast
        NoBroadcast = 1,
        /// Address check, 0x00 is broadcast
        Broadcast00 = 2,
        /// Address check, 0x00 and 0xFF are broadcast
        Broadcast00AndFF = 3,
    }
}

field_enum! {
    /// RX/TX data path (PKTCTRL0 bits 5:4)
    pub enum PacketFormat {
        /// FIFOs for RX and TX
        Normal = 0,
        /// Synchronous serial mode, data in on GDO0 and out on a GDOx pin
        SyncSerial = 1,
        /// Random TX mode, PN9 generator. Works as normal mode in RX
        RandomTx = 2,
        /// Asynchronous serial mode, data in on GDO0 and out on a GDOx pin
        AsyncSerial = 3,
    }
}

field_enum! {
    /// Packet length configuration (PKTCTRL0 bits 1:0)
    pub enum LengthConfig {
        /// Fixed length, set by PKTLEN
        Fixed = 0,
        /// Variable length, first byte after the sync word
        Variable = 1,
        /// Infinite packet length
        Infinite = 2,
    }
}

/// Sync word (addresses: 0x04..=0x05)
///
/// SYNC1 holds the high byte. In the 30 of 32 sync modes the word is sent
/// twice.
#[register(0x04u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncWord {
    /// 16-bit sync word
    pub word: u16,
}

impl Default for SyncWord {
    fn default() -> Self {
        Self { word: 0xD391 }
    }
}

/// Packet length (address: 0x06)
///
/// Fixed length mode: the packet length. Variable length mode: the maximum
/// length allowed.
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketLength {
    /// Length in bytes
    pub length: u8,
}

/// Packet automation control 1 (address: 0x07)
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl1 {
    /// Preamble quality estimator threshold, 3 bits
    pub preamble_quality_threshold: u8,
    /// Flush the RX FIFO when the CRC check fails
    pub crc_autoflush: bool,
    /// Append RSSI and LQI/CRC_OK to the payload
    pub append_status: bool,
    /// Address check configuration
    pub address_check: AddressCheck,
}

/// Packet automation control 0 (address: 0x08)
///
/// # Important Notes
/// - Whitening is only available in normal FIFO mode
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketControl0 {
    /// Data whitening
    pub white_data: bool,
    /// Packet format
    pub packet_format: PacketFormat,
    /// CRC calculation in TX and check in RX
    pub crc: bool,
    /// Packet length configuration
    pub length_config: LengthConfig,
}

/// Device address (address: 0x09)
///
/// Used for packet filtration. Broadcast addresses are 0x00 and 0xFF
/// depending on [`AddressCheck`].
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct DeviceAddress {
    /// Address byte
    pub address: u8,
}

impl PacketControl1 {
    /// PQT, bits 7:5
    pub const PREAMBLE_QUALITY_THRESHOLD: Field = Field::new(Address::Pktctrl1, 3, 5);
    /// CRC_AUTOFLUSH, bit 3
    pub const CRC_AUTOFLUSH: Field = Field::new(Address::Pktctrl1, 1, 3);
    /// APPEND_STATUS, bit 2
    pub const APPEND_STATUS: Field = Field::new(Address::Pktctrl1, 1, 2);
    /// ADR_CHK, bits 1:0
    pub const ADDRESS_CHECK: Field = Field::new(Address::Pktctrl1, 2, 0);
}

impl PacketControl0 {
    /// WHITE_DATA, bit 6
    pub const WHITE_DATA: Field = Field::new(Address::Pktctrl0, 1, 6);
    /// PKT_FORMAT, bits 5:4
    pub const PACKET_FORMAT: Field = Field::new(Address::Pktctrl0, 2, 4);
    /// CRC_EN, bit 2
    pub const CRC: Field = Field::new(Address::Pktctrl0, 1, 2);
    /// LENGTH_CONFIG, bits 1:0
    pub const LENGTH_CONFIG: Field = Field::new(Address::Pktctrl0, 2, 0);
}

impl ConfigRegister for SyncWord {}
impl ConfigRegister for PacketLength {}
impl ConfigRegister for PacketControl1 {}
impl ConfigRegister for PacketControl0 {}
impl ConfigRegister for DeviceAddress {}

impl FromByteArray for SyncWord {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            word: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for SyncWord {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.word.to_be_bytes())
    }
}

impl FromByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}

impl FromByteArray for PacketControl1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let address_check = match Self::ADDRESS_CHECK.get(bytes[0]) {
            0 => AddressCheck::Disabled,
            1 => AddressCheck::NoBroadcast,
            2 => AddressCheck::Broadcast00,
            _ => AddressCheck::Broadcast00AndFF,
        };

        Ok(Self {
            preamble_quality_threshold: Self::PREAMBLE_QUALITY_THRESHOLD.get(bytes[0]),
            crc_autoflush: Self::CRC_AUTOFLUSH.get(bytes[0]) != 0,
            append_status: Self::APPEND_STATUS.get(bytes[0]) != 0,
            address_check,
        })
    }
}

impl ToByteArray for PacketControl1 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::PREAMBLE_QUALITY_THRESHOLD.set(0, self.preamble_quality_threshold)?;
        let byte = Self::CRC_AUTOFLUSH.set(byte, self.crc_autoflush.into())?;
        let byte = Self::APPEND_STATUS.set(byte, self.append_status.into())?;
        Ok([Self::ADDRESS_CHECK.set(byte, self.address_check.into())?])
    }
}

impl FromByteArray for PacketControl0 {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let packet_format = match Self::PACKET_FORMAT.get(bytes[0]) {
            0 => PacketFormat::Normal,
            1 => PacketFormat::SyncSerial,
            2 => PacketFormat::RandomTx,
            _ => PacketFormat::AsyncSerial,
        };

        Ok(Self {
            white_data: Self::WHITE_DATA.get(bytes[0]) != 0,
            packet_format,
            crc: Self::CRC.get(bytes[0]) != 0,
            length_config: LengthConfig::try_from(Self::LENGTH_CONFIG.get(bytes[0]))?,
        })
    }
}

impl ToByteArray for PacketControl0 {
    type Error = Error;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let byte = Self::WHITE_DATA.set(0, self.white_data.into())?;
        let byte = Self::PACKET_FORMAT.set(byte, self.packet_format.into())?;
        let byte = Self::CRC.set(byte, self.crc.into())?;
        Ok([Self::LENGTH_CONFIG.set(byte, self.length_config.into())?])
    }
}

impl FromByteArray for DeviceAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { address: bytes[0] })
    }
}

impl ToByteArray for DeviceAddress {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}
