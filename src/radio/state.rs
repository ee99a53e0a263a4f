use embassy_futures::select::{select, Either};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use embedded_hal_async::digital::Wait;

use super::{Cc1101, MAX_PAYLOAD};
use crate::commands::Strobe;
use crate::registers::map::{FIFO, FIFO_SIZE};
use crate::registers::MachineState;
use crate::signal::PacketSignal;
use crate::Error;

/// Polls of MARCSTATE while waiting for a transmission to finish
const TX_POLL_LIMIT: u32 = 100;
/// Interval between those polls
const TX_POLL_INTERVAL_MS: u32 = 10;
/// Interval between polls in [`Cc1101::wait_for_state`]
const STATE_POLL_INTERVAL_MS: u32 = 1;

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
{
    /// Resets the chip (SRES). Every configuration register returns to its
    /// reset value and has to be written again.
    pub fn reset(&mut self) -> Result<(), Error> {
        log::info!("cc1101::reset");
        self.device.command_strobe(Strobe::Sres)
    }

    /// Exits RX/TX and turns off the frequency synthesizer (SIDLE)
    pub fn enter_idle(&mut self) -> Result<(), Error> {
        log::info!("cc1101::enter_idle");
        self.device.command_strobe(Strobe::Sidle)
    }

    /// Enables RX (SRX)
    pub fn enter_rx(&mut self) -> Result<(), Error> {
        log::info!("cc1101::enter_rx");
        self.device.command_strobe(Strobe::Srx)
    }

    /// Enables TX (STX). With CCA enabled the chip only leaves RX if the
    /// channel is clear.
    pub fn enter_tx(&mut self) -> Result<(), Error> {
        log::info!("cc1101::enter_tx");
        self.device.command_strobe(Strobe::Stx)
    }

    /// Enters power down. The chip cannot power down from RX or TX, so IDLE
    /// is strobed first.
    pub fn power_down(&mut self) -> Result<(), Error> {
        log::info!("cc1101::power_down");
        self.device.command_strobe(Strobe::Sidle)?;
        self.device.command_strobe(Strobe::Spwd)
    }

    /// Flushes the RX FIFO (SFRX). Only valid in IDLE or RXFIFO_OVERFLOW.
    pub fn flush_rx(&mut self) -> Result<(), Error> {
        self.device.command_strobe(Strobe::Sfrx)
    }

    /// Flushes the TX FIFO (SFTX). Only valid in IDLE or TXFIFO_UNDERFLOW.
    pub fn flush_tx(&mut self) -> Result<(), Error> {
        self.device.command_strobe(Strobe::Sftx)
    }

    /// Calibrates the frequency synthesizer and turns it off (SCAL)
    pub fn calibrate(&mut self) -> Result<(), Error> {
        log::info!("cc1101::calibrate");
        self.device.command_strobe(Strobe::Scal)
    }

    /// Polls MARCSTATE until it reads `target`, at most `timeout_steps`
    /// times, 1 ms apart.
    ///
    /// A state that already matches returns after one read with no delay.
    /// When the wait runs out in RXFIFO_OVERFLOW both FIFOs are flushed before
    /// the timeout is reported.
    ///
    /// # Errors
    /// * [`Error::Timeout`] - `target` was not seen
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - MARCSTATE holds a reserved value
    pub fn wait_for_state(&mut self, target: MachineState, timeout_steps: u8) -> Result<(), Error> {
        let mut last = None;

        for _ in 0..timeout_steps {
            let state = self.machine_state()?;
            if state == target {
                return Ok(());
            }
            last = Some(state);
            self.delay.delay_ms(STATE_POLL_INTERVAL_MS);
        }

        log::warn!("cc1101::wait_for_state timed out in {last:?} waiting for {target:?}");

        if last == Some(MachineState::RxFifoOverflow) {
            self.flush_rx()?;
            self.flush_tx()?;
        }

        Err(Error::Timeout)
    }

    /// Sends one variable length packet.
    ///
    /// The length byte and `payload` are written to the TX FIFO in one burst,
    /// TX is strobed and MARCSTATE is polled until the chip returns to IDLE,
    /// after which the TX FIFO is flushed.
    ///
    /// Returns `Ok(true)` once IDLE is seen. This only means the chip
    /// finished the transmit sequence; nothing confirms the packet was
    /// received. Returns `Ok(false)` when the TX FIFO underflowed or IDLE was
    /// not reached within 1 s; the chip is then forced to IDLE and the FIFO
    /// flushed.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - `payload` longer than [`MAX_PAYLOAD`].
    ///   Nothing is sent.
    /// * [`Error::Bus`] - SPI communication failed
    /// * [`Error::Deserialization`] - MARCSTATE holds a reserved value
    pub fn send_data(&mut self, payload: &[u8]) -> Result<bool, Error> {
        if payload.len() > MAX_PAYLOAD {
            log::warn!(
                "cc1101::send_data {} bytes do not fit the TX FIFO",
                payload.len()
            );
            return Err(Error::InvalidArgument);
        }

        let mut frame = [0u8; FIFO_SIZE];
        frame[0] = payload.len() as u8;
        frame[1..=payload.len()].copy_from_slice(payload);

        log::debug!("cc1101::send_data writing {} bytes to the TX FIFO", payload.len());
        self.device.write_burst(FIFO, &frame[..=payload.len()])?;
        self.enter_tx()?;

        for _ in 0..TX_POLL_LIMIT {
            match self.machine_state()? {
                MachineState::Idle => {
                    self.flush_tx()?;
                    return Ok(true);
                }
                MachineState::TxFifoUnderflow => {
                    log::warn!("cc1101::send_data TX FIFO underflow");
                    self.flush_tx()?;
                    return Ok(false);
                }
                _ => self.delay.delay_ms(TX_POLL_INTERVAL_MS),
            }
        }

        log::warn!("cc1101::send_data no return to IDLE, aborting");
        self.enter_idle()?;
        self.flush_tx()?;
        Ok(false)
    }

    /// Waits up to `timeout_ms` for `signal`, polling it every millisecond,
    /// and consumes it.
    ///
    /// # Errors
    /// * [`Error::Timeout`] - no packet edge was signalled in time
    pub fn wait_for_packet(&mut self, signal: &PacketSignal, timeout_ms: u32) -> Result<(), Error> {
        for _ in 0..timeout_ms {
            if signal.take() {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }

        if signal.take() {
            Ok(())
        } else {
            log::warn!("cc1101::wait_for_packet timed out after {timeout_ms} ms");
            Err(Error::Timeout)
        }
    }
}

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    SPI: SpiDevice,
    GDO0: OutputPin,
    DELAY: DelayNs,
{
    /// Clocks one byte out on GDO0, most significant bit first, then drives
    /// the line low and waits 1 ms.
    ///
    /// Meant for the asynchronous serial packet format, where the chip
    /// modulates whatever level GDO0 carries while in TX. Bit timing is left
    /// to the caller's data rate setting.
    ///
    /// # Errors
    /// * [`Error::Pin`] - driving GDO0 failed
    pub fn send_async_byte(&mut self, byte: u8) -> Result<(), Error> {
        for bit in (0..8).rev() {
            if byte & (1 << bit) != 0 {
                self.gdo0.set_high().map_err(Error::pin)?;
            } else {
                self.gdo0.set_low().map_err(Error::pin)?;
            }
        }

        self.gdo0.set_low().map_err(Error::pin)?;
        self.delay.delay_ms(1);
        Ok(())
    }
}

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    GDO2: InputPin,
{
    /// Current GDO2 level. With the default IOCFG2 setting it is high from
    /// sync word to end of packet.
    ///
    /// # Errors
    /// * [`Error::Pin`] - reading GDO2 failed
    pub fn packet_in_progress(&mut self) -> Result<bool, Error> {
        self.gdo2.is_high().map_err(Error::pin)
    }
}

impl<SPI, GDO0, GDO2, DELAY> Cc1101<SPI, GDO0, GDO2, DELAY>
where
    GDO2: Wait,
{
    /// Waits for the GDO2 falling edge that ends a packet, racing it against
    /// a `timeout_ms` delay.
    ///
    /// # Errors
    /// * [`Error::Timeout`] - no edge within `timeout_ms`
    /// * [`Error::Pin`] - waiting on GDO2 failed
    pub async fn wait_for_packet_edge<D>(&mut self, delay: &mut D, timeout_ms: u32) -> Result<(), Error>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        match select(self.gdo2.wait_for_falling_edge(), delay.delay_ms(timeout_ms)).await {
            Either::First(result) => result.map_err(Error::pin),
            Either::Second(()) => {
                log::warn!("cc1101::wait_for_packet_edge timed out after {timeout_ms} ms");
                Err(Error::Timeout)
            }
        }
    }
}
