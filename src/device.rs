//! CC1101 register access layer
//!
//! [`Device<SPI>`] wraps an `embedded-hal` [`SpiDevice`] and speaks the
//! CC1101 header byte convention: the register address with the burst and
//! read flags from [`registers::map`](crate::registers::map) OR'd in.
//!
//! Two levels are provided:
//! - raw byte primitives addressed by [`Address`], [`StatusAddress`] or a
//!   plain address byte (FIFO, PATABLE)
//! - typed access to the `regiface` registers in [`registers`](crate::registers),
//!   where the register class picks the right flag
//!
//! Every call is one SPI transaction. A failed transaction is returned as
//! [`Error::Bus`] and never retried.
//!
//! # Example
//! ```no_run
//! use cc1101::{Device, Error, PacketControl0};
//! use embedded_hal::spi::SpiDevice;
//!
//! fn enable_crc<SPI: SpiDevice>(spi: SPI) -> Result<Device<SPI>, Error> {
//!     let mut device = Device::new(spi);
//!     device.modify_register(|reg: &mut PacketControl0| reg.crc = true)?;
//!     Ok(device)
//! }
//! ```

use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{ByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::commands::Strobe;
use crate::registers::map::{Address, StatusAddress, READ_BURST, READ_SINGLE, WRITE_BURST};
use crate::registers::{ConfigRegister, Field, StatusRegister};
use crate::Error;

/// Register level interface to the CC1101.
///
/// Owns the SPI device. All methods take `&mut self`, so a read-modify-write
/// can never interleave with another access through the same `Device`.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI device.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Writes one configuration register.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn write_config(&mut self, address: Address, value: u8) -> Result<(), Error> {
        log::trace!("cc1101::write {:#04x} <- {value:#04x}", address.addr());
        self.spi.write(&[address.addr(), value]).map_err(Error::bus)
    }

    /// Writes consecutive registers, the PA table or the TX FIFO in one burst.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn write_burst(&mut self, address: impl Into<u8>, bytes: &[u8]) -> Result<(), Error> {
        let header = address.into() | WRITE_BURST;
        log::trace!("cc1101::write_burst {header:#04x} <- {bytes:02x?}");

        self.spi
            .transaction(&mut [Operation::Write(&[header]), Operation::Write(bytes)])
            .map_err(Error::bus)
    }

    /// Reads one configuration register.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn read_config(&mut self, address: Address) -> Result<u8, Error> {
        self.read_with_header(address.addr() | READ_SINGLE)
    }

    /// Reads one status register. Status registers are always burst addressed.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn read_status(&mut self, address: StatusAddress) -> Result<u8, Error> {
        self.read_with_header(address.addr() | READ_BURST)
    }

    /// Reads `bytes.len()` bytes from consecutive registers, the PA table or
    /// the RX FIFO in one burst.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn read_burst(&mut self, address: impl Into<u8>, bytes: &mut [u8]) -> Result<(), Error> {
        let header = address.into() | READ_BURST;

        self.spi
            .transaction(&mut [Operation::Write(&[header]), Operation::Read(bytes)])
            .map_err(Error::bus)?;

        log::trace!("cc1101::read_burst {header:#04x} -> {bytes:02x?}");
        Ok(())
    }

    /// Issues a command strobe.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn command_strobe(&mut self, strobe: Strobe) -> Result<(), Error> {
        log::trace!("cc1101::strobe {strobe:?}");
        self.spi.write(&[strobe.opcode()]).map_err(Error::bus)
    }

    /// Reads a typed configuration register.
    ///
    /// Registers wider than one byte are read with a single burst.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - a field holds a reserved value
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + ConfigRegister,
    {
        let mut raw_value = R::Array::new();
        let flag = if raw_value.as_ref().len() > 1 {
            READ_BURST
        } else {
            READ_SINGLE
        };

        self.spi
            .transaction(&mut [
                Operation::Write(&[R::id() | flag]),
                Operation::Read(raw_value.as_mut()),
            ])
            .map_err(Error::bus)?;

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a typed configuration register.
    ///
    /// Registers wider than one byte are written with a single burst.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - a field value does not fit its bits.
    ///   Nothing is written.
    /// * [`Error::Bus`] - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8> + ConfigRegister,
        Error: From<<R as ToByteArray>::Error>,
    {
        let raw_value = register.to_bytes()?;
        let bytes: &[u8] = raw_value.as_ref();

        match bytes {
            [value] => {
                log::trace!("cc1101::write {:#04x} <- {value:#04x}", R::id());
                self.spi.write(&[R::id(), *value]).map_err(Error::bus)
            }
            _ => self.write_burst(R::id(), bytes),
        }
    }

    /// Reads a register, lets `f` change it and writes it back.
    ///
    /// Fields `f` does not touch are written back exactly as read.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - the current value holds a reserved field
    /// * [`Error::InvalidArgument`] - `f` stored a value wider than its field.
    ///   Nothing is written.
    pub fn modify_register<R>(&mut self, f: impl FnOnce(&mut R)) -> Result<(), Error>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8> + ConfigRegister,
        Error: From<<R as ToByteArray>::Error>,
    {
        let mut register = self.read_register::<R>()?;
        f(&mut register);
        self.write_register(register)
    }

    /// Reads one bit field of a configuration register.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn read_field(&mut self, field: Field) -> Result<u8, Error> {
        Ok(field.get(self.read_config(field.address)?))
    }

    /// Replaces one bit field of a configuration register, keeping every
    /// other bit of the raw byte, including reserved values the typed
    /// register would refuse to decode.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - `value` does not fit the field. Nothing
    ///   is read or written.
    /// * [`Error::Bus`] - SPI communication failed
    pub fn write_field(&mut self, field: Field, value: u8) -> Result<(), Error> {
        let value = field.check(value)?;
        let current = self.read_config(field.address)?;
        self.write_config(field.address, field.set(current, value)?)
    }

    /// Reads a typed status register.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - the register holds a reserved value
    pub fn read_status_register<R>(&mut self) -> Result<R, Error>
    where
        R: StatusRegister,
    {
        let mut raw_value = R::Array::new();

        self.spi
            .transaction(&mut [
                Operation::Write(&[R::id() | READ_BURST]),
                Operation::Read(raw_value.as_mut()),
            ])
            .map_err(Error::bus)?;

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    fn read_with_header(&mut self, header: u8) -> Result<u8, Error> {
        let mut value = [0u8];

        self.spi
            .transaction(&mut [Operation::Write(&[header]), Operation::Read(&mut value)])
            .map_err(Error::bus)?;

        log::trace!("cc1101::read {header:#04x} -> {:#04x}", value[0]);
        Ok(value[0])
    }
}
