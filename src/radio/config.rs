use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::Cc1101;
use crate::convert;
use crate::registers::{
    AddressCheck, AgcControl0, AgcControl1, CarrierSenseThreshold, CcaMode, ChannelNumber,
    Deviation, DeviceAddress, Field, FilterLength, Frequency, FrontEndTx, IsmBand, LengthConfig,
    ModemConfig1, ModemConfig2, ModemConfig3, ModemConfig4, Modulation, PaTable, PacketControl0,
    PacketControl1, PacketFormat, PacketLength, PreambleLength, StateMachineConfig1, SyncMode,
    SyncWord, TxOffMode,
};
use crate::Error;

/// Synthesizer settle time after a frequency or band change
const SETTLE_MS: u32 = 50;

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
{
    /// Sets the carrier frequency in MHz and waits for the synthesizer to
    /// settle.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - outside 300-348, 387-464 or 779-928 MHz.
    ///   Nothing is written.
    pub fn set_carrier_frequency(&mut self, mhz: f64) -> Result<(), Error> {
        let frequency = Frequency::from_mhz(mhz).inspect_err(|_| {
            log::warn!("cc1101::set_carrier_frequency {mhz} MHz is outside the supported bands")
        })?;

        self.device.write_register(frequency)?;
        self.delay.delay_ms(SETTLE_MS);

        log::debug!("cc1101::set_carrier_frequency {mhz} MHz -> {:02x?}", frequency.word);
        Ok(())
    }

    /// Carrier frequency in MHz
    pub fn carrier_frequency(&mut self) -> Result<f64, Error> {
        Ok(self.device.read_register::<Frequency>()?.mhz())
    }

    /// Applies a band preset: carrier frequency plus the matching PA table.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - preset frequency outside the supported
    ///   bands, see [`set_carrier_frequency`](Self::set_carrier_frequency)
    /// * [`Error::Bus`] - SPI communication failed
    pub fn set_ism_band(&mut self, band: IsmBand) -> Result<(), Error> {
        let preset = band.preset();

        self.set_carrier_frequency(preset.frequency_mhz)?;
        self.device.write_register(preset.pa_table)?;
        self.delay.delay_ms(SETTLE_MS);

        log::info!("cc1101::set_ism_band {band:?}");
        Ok(())
    }

    /// Sets the data rate in kBaud. The bandwidth bits sharing MDMCFG4 are
    /// kept.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - rate cannot be encoded. Nothing is written.
    pub fn set_baud_rate(&mut self, kbaud: f64) -> Result<(), Error> {
        let (exponent, mantissa) = convert::baud_to_registers(kbaud)
            .inspect_err(|_| log::warn!("cc1101::set_baud_rate {kbaud} kBaud cannot be encoded"))?;

        self.device
            .modify_register(|reg: &mut ModemConfig4| reg.data_rate_exponent = exponent)?;
        self.device.write_register(ModemConfig3 {
            data_rate_mantissa: mantissa,
        })?;

        log::debug!("cc1101::set_baud_rate {kbaud} kBaud -> E {exponent} M {mantissa}");
        Ok(())
    }

    /// Data rate in kBaud
    pub fn baud_rate(&mut self) -> Result<f64, Error> {
        let mdmcfg4: ModemConfig4 = self.device.read_register()?;
        let mdmcfg3: ModemConfig3 = self.device.read_register()?;
        Ok(convert::registers_to_baud(
            mdmcfg4.data_rate_exponent,
            mdmcfg3.data_rate_mantissa,
        ))
    }

    /// Sets the receiver channel filter bandwidth in kHz. The data rate
    /// exponent sharing MDMCFG4 is kept.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - outside 58..=812 kHz. Nothing is written.
    pub fn set_rx_bandwidth(&mut self, khz: u16) -> Result<(), Error> {
        let (exponent, mantissa) = convert::bandwidth_to_registers(khz)
            .inspect_err(|_| log::warn!("cc1101::set_rx_bandwidth {khz} kHz is out of range"))?;

        self.device.modify_register(|reg: &mut ModemConfig4| {
            reg.bandwidth_exponent = exponent;
            reg.bandwidth_mantissa = mantissa;
        })?;

        log::debug!("cc1101::set_rx_bandwidth {khz} kHz -> E {exponent} M {mantissa}");
        Ok(())
    }

    /// Receiver channel filter bandwidth in kHz
    pub fn rx_bandwidth(&mut self) -> Result<u16, Error> {
        let reg: ModemConfig4 = self.device.read_register()?;
        Ok(convert::registers_to_bandwidth(
            reg.bandwidth_exponent,
            reg.bandwidth_mantissa,
        ))
    }

    /// Sets the FSK frequency deviation in kHz. No effect with ASK/OOK.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - deviation cannot be encoded. Nothing is written.
    pub fn set_deviation(&mut self, khz: f64) -> Result<(), Error> {
        let (exponent, mantissa) = convert::deviation_to_registers(khz)
            .inspect_err(|_| log::warn!("cc1101::set_deviation {khz} kHz cannot be encoded"))?;

        self.device.write_register(Deviation { exponent, mantissa })?;

        log::debug!("cc1101::set_deviation {khz} kHz -> E {exponent} M {mantissa}");
        Ok(())
    }

    /// FSK frequency deviation in kHz
    pub fn deviation(&mut self) -> Result<f64, Error> {
        let reg: Deviation = self.device.read_register()?;
        Ok(convert::registers_to_deviation(reg.exponent, reg.mantissa))
    }

    /// Selects the PA table entry for an output power in dBm, rounding up to
    /// the next level.
    ///
    /// # Errors
    /// * [`Error::InvalidParameter`] - outside -30..=10 dBm. Nothing is written.
    pub fn set_output_power(&mut self, dbm: i8) -> Result<(), Error> {
        let index = convert::power_to_pa_index(dbm)
            .inspect_err(|_| log::warn!("cc1101::set_output_power {dbm} dBm is out of range"))?;

        self.device.write_field(FrontEndTx::PA_POWER, index)?;

        log::debug!("cc1101::set_output_power {dbm} dBm -> PA index {index}");
        Ok(())
    }

    /// Output power level in dBm of the selected PA table entry
    pub fn output_power(&mut self) -> Result<i8, Error> {
        Ok(convert::pa_index_to_power(self.pa_power_index()?))
    }

    /// Selects a PA table entry directly.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - `index` above 7. Nothing is written.
    pub fn set_pa_power_index(&mut self, index: u8) -> Result<(), Error> {
        self.device.write_field(FrontEndTx::PA_POWER, index)
    }

    /// Selected PA table entry
    pub fn pa_power_index(&mut self) -> Result<u8, Error> {
        self.device.read_field(FrontEndTx::PA_POWER)
    }

    /// Writes all eight PA table entries
    pub fn set_pa_table(&mut self, table: PaTable) -> Result<(), Error> {
        self.device.write_register(table)
    }

    /// Reads the PA table
    pub fn pa_table(&mut self) -> Result<PaTable, Error> {
        self.device.read_register()
    }

    /// Sets the modulation format
    pub fn set_modulation(&mut self, modulation: Modulation) -> Result<(), Error> {
        log::debug!("cc1101::set_modulation {modulation:?}");
        self.device
            .write_field(ModemConfig2::MODULATION, modulation.into())
    }

    /// Modulation format
    ///
    /// # Errors
    /// * [`Error::Deserialization`] - MOD_FORMAT holds a reserved value
    pub fn modulation(&mut self) -> Result<Modulation, Error> {
        self.read_enum(ModemConfig2::MODULATION)
    }

    /// Enables or disables Manchester encoding
    pub fn set_manchester(&mut self, enabled: bool) -> Result<(), Error> {
        self.device
            .write_field(ModemConfig2::MANCHESTER, enabled.into())
    }

    /// Manchester encoding enabled
    pub fn manchester(&mut self) -> Result<bool, Error> {
        self.read_flag(ModemConfig2::MANCHESTER)
    }

    /// Sets the combined sync word qualifier mode
    pub fn set_sync_mode(&mut self, mode: SyncMode) -> Result<(), Error> {
        self.device.write_field(ModemConfig2::SYNC_MODE, mode.into())
    }

    /// Sync word qualifier mode
    pub fn sync_mode(&mut self) -> Result<SyncMode, Error> {
        self.read_enum(ModemConfig2::SYNC_MODE)
    }

    /// Sets the 16-bit sync word
    pub fn set_sync_word(&mut self, word: u16) -> Result<(), Error> {
        self.device.write_register(SyncWord { word })
    }

    /// 16-bit sync word
    pub fn sync_word(&mut self) -> Result<u16, Error> {
        Ok(self.device.read_register::<SyncWord>()?.word)
    }

    /// Sets the minimum number of preamble bytes sent
    pub fn set_preamble_length(&mut self, preamble: PreambleLength) -> Result<(), Error> {
        self.device
            .write_field(ModemConfig1::PREAMBLE, preamble.into())
    }

    /// Minimum number of preamble bytes sent
    pub fn preamble_length(&mut self) -> Result<PreambleLength, Error> {
        self.read_enum(ModemConfig1::PREAMBLE)
    }

    /// Sets the clear channel assessment mode
    pub fn set_cca_mode(&mut self, mode: CcaMode) -> Result<(), Error> {
        self.device
            .write_field(StateMachineConfig1::CCA_MODE, mode.into())
    }

    /// Clear channel assessment mode
    pub fn cca_mode(&mut self) -> Result<CcaMode, Error> {
        self.read_enum(StateMachineConfig1::CCA_MODE)
    }

    /// Sets the state entered after a packet has been sent.
    ///
    /// [`send_data`](Self::send_data) waits for IDLE, so anything other than
    /// [`TxOffMode::Idle`] makes it time out.
    pub fn set_txoff_mode(&mut self, mode: TxOffMode) -> Result<(), Error> {
        self.device
            .write_field(StateMachineConfig1::TXOFF_MODE, mode.into())
    }

    /// State entered after a packet has been sent
    pub fn txoff_mode(&mut self) -> Result<TxOffMode, Error> {
        self.read_enum(StateMachineConfig1::TXOFF_MODE)
    }

    /// Sets the relative carrier sense threshold
    pub fn set_carrier_sense(&mut self, threshold: CarrierSenseThreshold) -> Result<(), Error> {
        self.device
            .write_field(AgcControl1::CARRIER_SENSE_RELATIVE, threshold.into())
    }

    /// Relative carrier sense threshold
    pub fn carrier_sense(&mut self) -> Result<CarrierSenseThreshold, Error> {
        self.read_enum(AgcControl1::CARRIER_SENSE_RELATIVE)
    }

    /// Sets the AGC averaging length (OOK/ASK decision boundary)
    pub fn set_filter_length(&mut self, length: FilterLength) -> Result<(), Error> {
        self.device
            .write_field(AgcControl0::FILTER_LENGTH, length.into())
    }

    /// AGC averaging length
    pub fn filter_length(&mut self) -> Result<FilterLength, Error> {
        self.read_enum(AgcControl0::FILTER_LENGTH)
    }

    /// Appends RSSI and LQI/CRC_OK status bytes to received payloads
    pub fn set_append_status(&mut self, enabled: bool) -> Result<(), Error> {
        self.device
            .write_field(PacketControl1::APPEND_STATUS, enabled.into())
    }

    /// Status bytes appended to received payloads
    pub fn append_status(&mut self) -> Result<bool, Error> {
        self.read_flag(PacketControl1::APPEND_STATUS)
    }

    /// Sets the address check mode for received packets
    pub fn set_address_check(&mut self, check: AddressCheck) -> Result<(), Error> {
        self.device
            .write_field(PacketControl1::ADDRESS_CHECK, check.into())
    }

    /// Address check mode for received packets
    pub fn address_check(&mut self) -> Result<AddressCheck, Error> {
        self.read_enum(PacketControl1::ADDRESS_CHECK)
    }

    /// Enables or disables data whitening
    pub fn set_white_data(&mut self, enabled: bool) -> Result<(), Error> {
        self.device
            .write_field(PacketControl0::WHITE_DATA, enabled.into())
    }

    /// Data whitening enabled
    pub fn white_data(&mut self) -> Result<bool, Error> {
        self.read_flag(PacketControl0::WHITE_DATA)
    }

    /// Sets the RX/TX data path
    pub fn set_packet_format(&mut self, format: PacketFormat) -> Result<(), Error> {
        self.device
            .write_field(PacketControl0::PACKET_FORMAT, format.into())
    }

    /// RX/TX data path
    pub fn packet_format(&mut self) -> Result<PacketFormat, Error> {
        self.read_enum(PacketControl0::PACKET_FORMAT)
    }

    /// Enables or disables CRC calculation in TX and checking in RX
    pub fn set_crc(&mut self, enabled: bool) -> Result<(), Error> {
        log::debug!("cc1101::set_crc {enabled}");
        self.device.write_field(PacketControl0::CRC, enabled.into())
    }

    /// CRC enabled
    pub fn crc(&mut self) -> Result<bool, Error> {
        self.read_flag(PacketControl0::CRC)
    }

    /// Sets the packet length mode
    pub fn set_length_config(&mut self, config: LengthConfig) -> Result<(), Error> {
        self.device
            .write_field(PacketControl0::LENGTH_CONFIG, config.into())
    }

    /// Packet length mode
    ///
    /// # Errors
    /// * [`Error::Deserialization`] - LENGTH_CONFIG holds the reserved value 3
    pub fn length_config(&mut self) -> Result<LengthConfig, Error> {
        self.read_enum(PacketControl0::LENGTH_CONFIG)
    }

    /// Sets the packet length (fixed mode) or maximum length (variable mode)
    pub fn set_packet_length(&mut self, length: u8) -> Result<(), Error> {
        self.device.write_register(PacketLength { length })
    }

    /// Packet length or maximum length
    pub fn packet_length(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_register::<PacketLength>()?.length)
    }

    /// Sets the device address used for packet filtration
    pub fn set_device_address(&mut self, address: u8) -> Result<(), Error> {
        self.device.write_register(DeviceAddress { address })
    }

    /// Device address
    pub fn device_address(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_register::<DeviceAddress>()?.address)
    }

    /// Sets the channel number
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        log::debug!("cc1101::set_channel {channel}");
        self.device.write_register(ChannelNumber { channel })
    }

    /// Channel number
    pub fn channel(&mut self) -> Result<u8, Error> {
        Ok(self.device.read_register::<ChannelNumber>()?.channel)
    }

    fn read_flag(&mut self, field: Field) -> Result<bool, Error> {
        Ok(self.device.read_field(field)? != 0)
    }

    fn read_enum<T: TryFrom<u8>>(&mut self, field: Field) -> Result<T, Error> {
        T::try_from(self.device.read_field(field)?).map_err(|_| Error::Deserialization)
    }
}
