//! High level CC1101 driver
//!
//! [`Cc1101`] owns the SPI device, both GDO lines and a delay provider. It
//! is split across three files:
//! - this one: construction, init and status queries
//! - `config`: setter/getter pairs in physical units
//! - `state`: strobes, state polling and the transmit sequence
//!
//! All methods take `&mut self`. Read-modify-write setters are therefore
//! never interleaved; wrap the driver in a mutex to share it between
//! contexts.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::conf::Config;
use crate::registers::map::{Address, DEFAULT_CONFIGURATION, FIFO_SIZE};
use crate::registers::{
    ChipVersion, LinkQuality, MachineState, MarcState, PacketStatus, PacketStatusRegister,
    PartNumber, Rssi, RxBytes, TxBytes,
};
use crate::{Device, Error};

mod config;
mod state;

#[cfg(test)]
mod tests;

/// Largest payload [`Cc1101::send_data`] accepts: the TX FIFO minus the
/// length byte
pub const MAX_PAYLOAD: usize = FIFO_SIZE - 1;

/// CC1101 transceiver
///
/// * `GDO0` - output, drives the TX data line in asynchronous serial mode
/// * `GDO2` - input, asserted from sync word to end of packet
/// * `DELAY` - settle delays and poll intervals
pub struct Cc1101<SPI, GDO0, GDO2, DELAY> {
    device: Device<SPI>,
    gdo0: GDO0,
    gdo2: GDO2,
    delay: DELAY,
}

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY> {
    /// Creates a driver. Nothing is sent to the chip until
    /// [`init`](Self::init) or another method is called.
    pub fn new(spi: SPI, gdo0: GDO0, gdo2: GDO2, delay: DELAY) -> Self {
        Self {
            device: Device::new(spi),
            gdo0,
            gdo2,
            delay,
        }
    }

    /// Releases the bus, pins and delay
    pub fn release(self) -> (SPI, GDO0, GDO2, DELAY) {
        (self.device.release(), self.gdo0, self.gdo2, self.delay)
    }

    /// Register level access for anything not covered by this driver
    pub fn device(&mut self) -> &mut Device<SPI> {
        &mut self.device
    }
}

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
{
    /// Resets the chip and applies `config`.
    ///
    /// Sequence: SRES, default register block, band preset, every field of
    /// `config`, then IDLE. The part number and version are read and logged
    /// last as a bus sanity check.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::InvalidParameter`] - a physical value in `config` is out of range
    pub fn init(&mut self, config: &Config) -> Result<(), Error> {
        log::info!("cc1101::init start");

        self.reset()?;
        self.write_default_registers()?;
        self.set_ism_band(config.band)?;
        self.set_channel(config.channel)?;
        self.set_baud_rate(config.baud_kbaud)?;
        self.set_rx_bandwidth(config.bandwidth_khz)?;
        self.set_deviation(config.deviation_khz)?;
        self.set_modulation(config.modulation)?;
        self.set_manchester(config.manchester)?;
        self.set_sync_mode(config.sync_mode)?;
        self.set_sync_word(config.sync_word)?;
        self.set_preamble_length(config.preamble)?;
        self.set_cca_mode(config.cca_mode)?;
        self.set_txoff_mode(config.txoff_mode)?;
        self.set_white_data(config.white_data)?;
        self.set_packet_format(config.packet_format)?;
        self.set_crc(config.crc)?;
        self.set_length_config(config.length_config)?;
        self.set_device_address(config.address)?;
        self.set_address_check(config.address_check)?;
        self.set_append_status(config.append_status)?;
        self.set_output_power(config.power_dbm)?;
        self.enter_idle()?;

        let part_number = self.part_number()?;
        let version = self.version()?;
        log::info!("cc1101::init done, partnum {part_number:#04x} version {version:#04x}");

        Ok(())
    }

    /// Writes the default block to configuration registers 0x00..=0x2E in
    /// one burst.
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    pub fn write_default_registers(&mut self) -> Result<(), Error> {
        log::debug!("cc1101::write_default_registers");
        self.device.write_burst(Address::Iocfg2, &DEFAULT_CONFIGURATION)
    }

    /// Chip part number
    pub fn part_number(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_status_register::<PartNumber>()?.value)
    }

    /// Chip version
    pub fn version(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_status_register::<ChipVersion>()?.value)
    }

    /// Raw RSSI status byte
    pub fn rssi(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_status_register::<Rssi>()?.raw)
    }

    /// RSSI in dBm
    pub fn rssi_dbm(&mut self) -> Result<f32, Error> {
        Ok(self.device.read_status_register::<Rssi>()?.dbm())
    }

    /// Link quality of the last received packet, with its CRC result
    pub fn link_quality(&mut self) -> Result<LinkQuality, Error> {
        self.device.read_status_register()
    }

    /// TX FIFO byte count and underflow flag
    pub fn tx_fifo_bytes(&mut self) -> Result<TxBytes, Error> {
        self.device.read_status_register()
    }

    /// RX FIFO byte count and overflow flag
    pub fn rx_fifo_bytes(&mut self) -> Result<RxBytes, Error> {
        self.device.read_status_register()
    }

    /// GDOx and packet status flags
    pub fn packet_status(&mut self) -> Result<PacketStatus, Error> {
        Ok(self.device.read_status_register::<PacketStatusRegister>()?.flags)
    }

    /// Current main radio control state
    ///
    /// # Errors
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - MARCSTATE holds a reserved value
    pub fn machine_state(&mut self) -> Result<MachineState, Error> {
        Ok(self.device.read_status_register::<MarcState>()?.state)
    }
}
