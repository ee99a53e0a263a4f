#![cfg_attr(not(test), no_std)]
//! CC1101 Radio Driver
//!
//! This crate provides a type-safe interface for the Texas Instruments CC1101
//! sub-GHz transceiver. The CC1101 is a low cost, low power radio for the 315,
//! 433, 868 and 915 MHz ISM/SRD bands, controlled over a 4-wire SPI bus with
//! two general purpose outputs (GDO0, GDO2) for packet and FIFO signalling.
//!
//! # Features
//! - Frequency bands: 300-348, 387-464 and 779-928 MHz
//! - Modulation: 2-FSK, GFSK, 4-FSK, MSK and ASK/OOK
//! - Data rate: 0.6-500 kBaud
//! - Output power: -30 to +10 dBm through an 8 entry PA table
//! - 64 byte TX and RX FIFOs with variable or fixed length packets
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Register level access
//!   - Header byte composition (R/W and burst flags)
//!   - Single and burst reads and writes, command strobes
//!   - Typed reads and read-modify-writes of `regiface` registers
//!
//! - [`registers`]: Register definitions
//!   - [`registers::map`]: Raw address catalogue and the default register block
//!   - Typed configuration registers (frequency, modem, packet, control, PA table)
//!   - Typed status registers (MARCSTATE, RSSI, FIFO byte counts, ...)
//!
//! - [`commands`]: Command strobes
//!
//! - [`convert`]: Conversions between physical units and register encodings
//!
//! - [`Cc1101`]: High level driver owning the bus, both GDO lines and a delay
//!
//! # Usage
//! [`Cc1101::init`] resets the chip and applies a [`Config`]. Afterwards the
//! individual setters change one parameter at a time, and [`Cc1101::send_data`]
//! sends one variable length packet.
//!
//! # Important Notes
//! - SRES returns every configuration register to its reset value
//! - Frequency and band changes wait 50 ms for the synthesizer to settle
//! - Configuration should be changed in IDLE
//! - The chip cannot enter power down from RX or TX
//!
//! # Example
//! ```no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiDevice;
//! use cc1101::{Cc1101, Config, Error, IsmBand};
//!
//! fn beacon<SPI, GDO0, GDO2, DELAY>(
//!     radio: &mut Cc1101<SPI, GDO0, GDO2, DELAY>,
//! ) -> Result<bool, Error>
//! where
//!     SPI: SpiDevice,
//!     GDO0: OutputPin,
//!     GDO2: InputPin,
//!     DELAY: DelayNs,
//! {
//!     let config = Config {
//!         band: IsmBand::Mhz868,
//!         crc: true,
//!         ..Config::default()
//!     };
//!     radio.init(&config)?;
//!
//!     radio.send_data(b"hello")
//! }
//! ```

pub mod commands;
pub mod conf;
pub mod convert;
pub mod device;
pub mod error;
pub mod registers;
pub mod signal;

mod radio;

pub use commands::*;
pub use conf::Config;
pub use device::Device;
pub use error::Error;
pub use radio::{Cc1101, MAX_PAYLOAD};
pub use registers::*;
pub use signal::PacketSignal;
