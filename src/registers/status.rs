//! Status registers
//!
//! Read-only registers reporting live chip state. They share addresses
//! 0x30..=0x3D with the command strobes and are only reached with the burst
//! bit set, so they implement [`StatusRegister`] and are read through
//! [`Device::read_status_register`](crate::Device::read_status_register).

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister};

use super::{InvalidValue, StatusRegister};
use crate::convert;

field_enum! {
    /// Main radio control state machine state (MARCSTATE bits 4:0)
    pub enum MachineState {
        /// SLEEP
        Sleep = 0x00,
        /// IDLE
        Idle = 0x01,
        /// XOFF
        Xoff = 0x02,
        /// VCOON_MC (MANCAL)
        VcoonMc = 0x03,
        /// REGON_MC (MANCAL)
        RegonMc = 0x04,
        /// MANCAL
        Mancal = 0x05,
        /// VCOON (FS_WAKEUP)
        Vcoon = 0x06,
        /// REGON (FS_WAKEUP)
        Regon = 0x07,
        /// STARTCAL (CALIBRATE)
        StartCal = 0x08,
        /// BWBOOST (SETTLING)
        BwBoost = 0x09,
        /// FS_LOCK (SETTLING)
        FsLock = 0x0A,
        /// IFADCON (SETTLING)
        IfadcOn = 0x0B,
        /// ENDCAL (CALIBRATE)
        EndCal = 0x0C,
        /// RX
        Rx = 0x0D,
        /// RX_END
        RxEnd = 0x0E,
        /// RX_RST
        RxRst = 0x0F,
        /// TXRX_SWITCH (TXRX_SETTLING)
        TxRxSwitch = 0x10,
        /// RXFIFO_OVERFLOW
        RxFifoOverflow = 0x11,
        /// FSTXON
        FsTxOn = 0x12,
        /// TX
        Tx = 0x13,
        /// TX_END
        TxEnd = 0x14,
        /// RXTX_SWITCH (RXTX_SETTLING)
        RxTxSwitch = 0x15,
        /// TXFIFO_UNDERFLOW
        TxFifoUnderflow = 0x16,
    }
}

/// Chip part number (address: 0x30)
#[register(0x30u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PartNumber {
    /// Always 0x00 on the CC1101
    pub value: u8,
}

/// Chip version number (address: 0x31)
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct ChipVersion {
    /// Subject to change without notice, 0x14 on current silicon
    pub value: u8,
}

/// Demodulator estimate for link quality (address: 0x33)
#[register(0x33u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct LinkQuality {
    /// The last CRC comparison matched
    pub crc_ok: bool,
    /// Link quality indicator, 7 bits. Lower is better.
    pub lqi: u8,
}

/// Received signal strength indication (address: 0x34)
#[register(0x34u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Rssi {
    /// Two's complement, half-dB steps, offset by
    /// [`RSSI_OFFSET_DB`](crate::convert::RSSI_OFFSET_DB)
    pub raw: u8,
}

impl Rssi {
    /// Signal strength in dBm
    pub fn dbm(&self) -> f32 {
        convert::rssi_to_dbm(self.raw)
    }
}

/// Main radio control state machine state (address: 0x35)
#[register(0x35u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct MarcState {
    /// Current state
    pub state: MachineState,
}

/// Underflow flag and number of bytes in the TX FIFO (address: 0x3A)
#[register(0x3Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct TxBytes {
    /// TX FIFO underflow
    pub underflow: bool,
    /// Bytes in the TX FIFO
    pub count: u8,
}

/// Overflow flag and number of bytes in the RX FIFO (address: 0x3B)
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxBytes {
    /// RX FIFO overflow
    pub overflow: bool,
    /// Bytes in the RX FIFO
    pub count: u8,
}

bitflags! {
    /// Current GDOx status and packet status (PKTSTATUS, address: 0x38)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketStatus: u8 {
        /// The last CRC comparison matched
        const CRC_OK = 1 << 7;
        /// Carrier sense
        const CARRIER_SENSE = 1 << 6;
        /// Preamble quality reached
        const PQT_REACHED = 1 << 5;
        /// Channel is clear
        const CHANNEL_CLEAR = 1 << 4;
        /// Start of frame delimiter, sync word found
        const SYNC_FOUND = 1 << 3;
        /// Current GDO2 value
        const GDO2 = 1 << 2;
        /// Current GDO0 value
        const GDO0 = 1 << 0;
    }
}

/// Packet status register (address: 0x38)
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PacketStatusRegister {
    /// Decoded flags
    pub flags: PacketStatus,
}

impl StatusRegister for PartNumber {}
impl StatusRegister for ChipVersion {}
impl StatusRegister for LinkQuality {}
impl StatusRegister for Rssi {}
impl StatusRegister for MarcState {}
impl StatusRegister for PacketStatusRegister {}
impl StatusRegister for TxBytes {}
impl StatusRegister for RxBytes {}

impl FromByteArray for PartNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for ChipVersion {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for LinkQuality {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            crc_ok: bytes[0] & 0x80 != 0,
            lqi: bytes[0] & 0x7F,
        })
    }
}

impl FromByteArray for Rssi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl FromByteArray for MarcState {
    type Error = InvalidValue;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            state: MachineState::try_from(bytes[0] & 0x1F)?,
        })
    }
}

impl FromByteArray for PacketStatusRegister {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: PacketStatus::from_bits_truncate(bytes[0]),
        })
    }
}

impl FromByteArray for TxBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            underflow: bytes[0] & 0x80 != 0,
            count: bytes[0] & 0x7F,
        })
    }
}

impl FromByteArray for RxBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            overflow: bytes[0] & 0x80 != 0,
            count: bytes[0] & 0x7F,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marcstate_ignores_upper_bits() {
        let reg = MarcState::from_bytes([0xE1]).unwrap();
        assert_eq!(reg.state, MachineState::Idle);
        let reg = MarcState::from_bytes([0x11]).unwrap();
        assert_eq!(reg.state, MachineState::RxFifoOverflow);
    }

    #[test]
    fn reserved_marcstate_is_rejected() {
        assert_eq!(MarcState::from_bytes([0x1F]), Err(InvalidValue(0x1F)));
    }

    #[test]
    fn fifo_counters_split_flag_from_count() {
        let tx = TxBytes::from_bytes([0x85]).unwrap();
        assert!(tx.underflow);
        assert_eq!(tx.count, 5);
        let rx = RxBytes::from_bytes([0x40]).unwrap();
        assert!(!rx.overflow);
        assert_eq!(rx.count, 0x40);
    }

    #[test]
    fn packet_status_flags() {
        let reg = PacketStatusRegister::from_bytes([0x9A]).unwrap();
        assert!(reg.flags.contains(PacketStatus::CRC_OK | PacketStatus::CHANNEL_CLEAR));
        assert!(reg.flags.contains(PacketStatus::SYNC_FOUND));
        assert!(!reg.flags.contains(PacketStatus::GDO2));
    }

    #[test]
    fn rssi_register_converts_to_dbm() {
        assert_eq!(Rssi { raw: 200 }.dbm(), -102.0);
    }
}
