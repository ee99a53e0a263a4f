use core::convert::Infallible;
use core::future::pending;

use embedded_hal_mock::eh1::delay::{CheckedDelay, Transaction as DelayTransaction};
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

use super::*;
use crate::registers::{IsmBand, LengthConfig, MachineState, Modulation, PacketFormat};
use crate::signal::PacketSignal;

type Radio = Cc1101<SpiMock<u8>, PinMock, PinMock, CheckedDelay>;

/// Expected bus traffic, one SPI transaction per call
#[derive(Default)]
struct Bus(Vec<SpiTransaction<u8>>);

impl Bus {
    fn strobe(mut self, opcode: u8) -> Self {
        self.0.extend([
            SpiTransaction::transaction_start(),
            SpiTransaction::write(opcode),
            SpiTransaction::transaction_end(),
        ]);
        self
    }

    fn read(mut self, header: u8, value: u8) -> Self {
        self.0.extend([
            SpiTransaction::transaction_start(),
            SpiTransaction::write(header),
            SpiTransaction::read(value),
            SpiTransaction::transaction_end(),
        ]);
        self
    }

    fn read_burst(mut self, header: u8, bytes: &[u8]) -> Self {
        self.0.extend([
            SpiTransaction::transaction_start(),
            SpiTransaction::write(header),
            SpiTransaction::read_vec(bytes.to_vec()),
            SpiTransaction::transaction_end(),
        ]);
        self
    }

    fn write(mut self, address: u8, value: u8) -> Self {
        self.0.extend([
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![address, value]),
            SpiTransaction::transaction_end(),
        ]);
        self
    }

    fn write_burst(mut self, header: u8, bytes: &[u8]) -> Self {
        self.0.extend([
            SpiTransaction::transaction_start(),
            SpiTransaction::write(header),
            SpiTransaction::write_vec(bytes.to_vec()),
            SpiTransaction::transaction_end(),
        ]);
        self
    }

    /// Single register read-modify-write
    fn rmw(self, address: u8, before: u8, after: u8) -> Self {
        self.read(address | 0x80, before).write(address, after)
    }

    fn marcstate(self, state: MachineState) -> Self {
        self.read(0xF5, state.into())
    }
}

fn setup_radio(bus: Bus, delays: &[DelayTransaction]) -> Radio {
    Cc1101::new(
        SpiMock::new(&bus.0),
        PinMock::new(&[]),
        PinMock::new(&[]),
        CheckedDelay::new(delays),
    )
}

fn check_expectations(radio: Radio) {
    let (mut spi, mut gdo0, mut gdo2, mut delay) = radio.release();
    spi.done();
    gdo0.done();
    gdo2.done();
    delay.done();
}

#[test]
fn send_data_prefixes_the_payload_length() {
    let bus = Bus::default()
        .write_burst(0x7F, &[0x01, 0xFF])
        .strobe(0x35)
        .marcstate(MachineState::Tx)
        .marcstate(MachineState::Idle)
        .strobe(0x3B);
    let mut radio = setup_radio(bus, &[DelayTransaction::delay_ms(10)]);

    assert_eq!(radio.send_data(&[0xFF]), Ok(true));

    check_expectations(radio);
}

#[test]
fn send_data_rejects_payloads_larger_than_the_fifo() {
    let mut radio = setup_radio(Bus::default(), &[]);

    assert_eq!(radio.send_data(&[0u8; 64]), Err(Error::InvalidArgument));

    check_expectations(radio);
}

#[test]
fn send_data_accepts_a_full_fifo() {
    let mut frame = vec![63u8];
    frame.extend_from_slice(&[0x5A; 63]);
    let bus = Bus::default()
        .write_burst(0x7F, &frame)
        .strobe(0x35)
        .marcstate(MachineState::Idle)
        .strobe(0x3B);
    let mut radio = setup_radio(bus, &[]);

    assert_eq!(radio.send_data(&[0x5A; 63]), Ok(true));

    check_expectations(radio);
}

#[test]
fn send_data_flushes_on_underflow() {
    let bus = Bus::default()
        .write_burst(0x7F, &[0x02, 0xAA, 0xBB])
        .strobe(0x35)
        .marcstate(MachineState::TxFifoUnderflow)
        .strobe(0x3B);
    let mut radio = setup_radio(bus, &[]);

    assert_eq!(radio.send_data(&[0xAA, 0xBB]), Ok(false));

    check_expectations(radio);
}

#[test]
fn send_data_gives_up_when_idle_never_comes() {
    let mut bus = Bus::default().write_burst(0x7F, &[0x00]).strobe(0x35);
    let mut delays = Vec::new();
    for _ in 0..100 {
        bus = bus.marcstate(MachineState::Tx);
        delays.push(DelayTransaction::delay_ms(10));
    }
    let bus = bus.strobe(0x36).strobe(0x3B);
    let mut radio = setup_radio(bus, &delays);

    assert_eq!(radio.send_data(&[]), Ok(false));

    check_expectations(radio);
}

#[test]
fn wait_for_state_returns_on_first_match() {
    let bus = Bus::default().marcstate(MachineState::Idle);
    let mut radio = setup_radio(bus, &[]);

    assert_eq!(radio.wait_for_state(MachineState::Idle, 10), Ok(()));

    check_expectations(radio);
}

#[test]
fn wait_for_state_uses_every_step_before_timing_out() {
    let bus = Bus::default()
        .marcstate(MachineState::Rx)
        .marcstate(MachineState::Rx)
        .marcstate(MachineState::Rx);
    let delays = vec![DelayTransaction::delay_ms(1); 3];
    let mut radio = setup_radio(bus, &delays);

    assert_eq!(
        radio.wait_for_state(MachineState::Idle, 3),
        Err(Error::Timeout)
    );

    check_expectations(radio);
}

#[test]
fn wait_for_state_recovers_from_rx_overflow() {
    let bus = Bus::default()
        .marcstate(MachineState::Rx)
        .marcstate(MachineState::RxFifoOverflow)
        .strobe(0x3A)
        .strobe(0x3B);
    let delays = vec![DelayTransaction::delay_ms(1); 2];
    let mut radio = setup_radio(bus, &delays);

    assert_eq!(
        radio.wait_for_state(MachineState::Idle, 2),
        Err(Error::Timeout)
    );

    check_expectations(radio);
}

#[test]
fn wait_for_state_with_no_steps_reads_nothing() {
    let mut radio = setup_radio(Bus::default(), &[]);

    assert_eq!(
        radio.wait_for_state(MachineState::Idle, 0),
        Err(Error::Timeout)
    );

    check_expectations(radio);
}

#[test]
fn set_crc_keeps_unrelated_bits() {
    let bus = Bus::default()
        .read(0x88, 0b0111_0001)
        .write(0x08, 0b0111_0101);
    let mut radio = setup_radio(bus, &[]);

    radio.set_crc(true).unwrap();

    check_expectations(radio);
}

#[test]
fn set_baud_rate_keeps_the_bandwidth_bits() {
    let bus = Bus::default()
        .read(0x90, 0xF5)
        .write(0x10, 0xF8)
        .write(0x11, 0x83);
    let mut radio = setup_radio(bus, &[]);

    radio.set_baud_rate(9.6).unwrap();

    check_expectations(radio);
}

#[test]
fn set_rx_bandwidth_keeps_the_data_rate_exponent() {
    let bus = Bus::default().read(0x90, 0x08).write(0x10, 0xC8);
    let mut radio = setup_radio(bus, &[]);

    radio.set_rx_bandwidth(102).unwrap();

    check_expectations(radio);
}

#[test]
fn rejected_parameters_cause_no_bus_traffic() {
    let mut radio = setup_radio(Bus::default(), &[]);

    assert_eq!(
        radio.set_carrier_frequency(500.0),
        Err(Error::InvalidParameter)
    );
    assert_eq!(radio.set_rx_bandwidth(900), Err(Error::InvalidParameter));
    assert_eq!(radio.set_output_power(12), Err(Error::InvalidParameter));
    assert_eq!(radio.set_baud_rate(0.0), Err(Error::InvalidParameter));
    assert_eq!(radio.set_pa_power_index(8), Err(Error::InvalidArgument));

    check_expectations(radio);
}

#[test]
fn carrier_frequency_round_trip() {
    let bus = Bus::default()
        .write_burst(0x4D, &[0x10, 0xB0, 0x71])
        .read_burst(0xCD, &[0x10, 0xB0, 0x71]);
    let mut radio = setup_radio(bus, &[DelayTransaction::delay_ms(50)]);

    radio.set_carrier_frequency(433.92).unwrap();
    let mhz = radio.carrier_frequency().unwrap();
    assert!((mhz - 433.92).abs() <= 0.025);

    check_expectations(radio);
}

#[test]
fn ism_band_writes_frequency_then_pa_table() {
    let bus = Bus::default()
        .write_burst(0x4D, &[0x21, 0x65, 0x6A])
        .write_burst(0x7E, &[0x03, 0x17, 0x1D, 0x26, 0x50, 0x86, 0xCD, 0xC0]);
    let delays = vec![DelayTransaction::delay_ms(50); 2];
    let mut radio = setup_radio(bus, &delays);

    radio.set_ism_band(IsmBand::Mhz868).unwrap();

    check_expectations(radio);
}

#[test]
fn output_power_selects_the_pa_index() {
    let bus = Bus::default()
        .read(0xA2, 0x10)
        .write(0x22, 0x17)
        .read(0xA2, 0x17);
    let mut radio = setup_radio(bus, &[]);

    radio.set_output_power(8).unwrap();
    assert_eq!(radio.output_power(), Ok(10));

    check_expectations(radio);
}

#[test]
fn modulation_and_format_getters_decode_fields() {
    let bus = Bus::default().read(0x92, 0x13).read(0x88, 0x35);
    let mut radio = setup_radio(bus, &[]);

    assert_eq!(radio.modulation(), Ok(Modulation::Gfsk));
    assert_eq!(radio.packet_format(), Ok(PacketFormat::AsyncSerial));

    check_expectations(radio);
}

#[test]
fn setters_overwrite_reserved_neighbour_values() {
    // LENGTH_CONFIG = 3 and MOD_FORMAT = 2 are reserved encodings
    let bus = Bus::default()
        .rmw(0x08, 0x07, 0x05)
        .read(0x88, 0x07)
        .rmw(0x12, 0x20, 0x28)
        .rmw(0x12, 0x20, 0x00)
        .read(0x92, 0x20);
    let mut radio = setup_radio(bus, &[]);

    radio.set_length_config(LengthConfig::Variable).unwrap();
    assert_eq!(radio.crc(), Ok(true));
    radio.set_manchester(true).unwrap();
    radio.set_modulation(Modulation::Fsk2).unwrap();
    assert_eq!(radio.modulation(), Err(Error::Deserialization));

    check_expectations(radio);
}

#[test]
fn init_runs_the_full_sequence() {
    let bus = Bus::default()
        .strobe(0x30)
        .write_burst(0x40, &DEFAULT_CONFIGURATION)
        .write_burst(0x4D, &[0x10, 0xB0, 0x71])
        .write_burst(0x7E, &[0xC6, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
        .write(0x0A, 0x00)
        // 1 kBaud, then 102 kHz bandwidth
        .rmw(0x10, 0xF5, 0xF5)
        .write(0x11, 0x43)
        .rmw(0x10, 0xF5, 0xC5)
        .write(0x15, 0x34)
        // modulation, Manchester, sync mode
        .rmw(0x12, 0x13, 0x03)
        .rmw(0x12, 0x03, 0x03)
        .rmw(0x12, 0x03, 0x00)
        .write_burst(0x44, &[0xD3, 0x91])
        .rmw(0x13, 0x22, 0x02)
        .rmw(0x17, 0x30, 0x00)
        .rmw(0x17, 0x00, 0x00)
        // whitening, format, CRC, length
        .rmw(0x08, 0x05, 0x05)
        .rmw(0x08, 0x05, 0x05)
        .rmw(0x08, 0x05, 0x01)
        .rmw(0x08, 0x01, 0x01)
        .write(0x09, 0x00)
        .rmw(0x07, 0x04, 0x04)
        .rmw(0x07, 0x04, 0x00)
        .rmw(0x22, 0x10, 0x14)
        .strobe(0x36)
        .read(0xF0, 0x00)
        .read(0xF1, 0x14);
    let delays = vec![DelayTransaction::delay_ms(50); 2];
    let mut radio = setup_radio(bus, &delays);

    assert_eq!(radio.init(&Config::default()), Ok(()));

    check_expectations(radio);
}

#[test]
fn sync_word_is_one_burst() {
    let bus = Bus::default()
        .write_burst(0x44, &[0x12, 0x34])
        .read_burst(0xC4, &[0x12, 0x34]);
    let mut radio = setup_radio(bus, &[]);

    radio.set_sync_word(0x1234).unwrap();
    assert_eq!(radio.sync_word(), Ok(0x1234));

    check_expectations(radio);
}

#[test]
fn status_queries() {
    let bus = Bus::default()
        .read(0xF0, 0x00)
        .read(0xF1, 0x14)
        .read(0xF4, 200)
        .read(0xF4, 50)
        .read(0xFA, 0x03)
        .read(0xFB, 0x81);
    let mut radio = setup_radio(bus, &[]);

    assert_eq!(radio.part_number(), Ok(0x00));
    assert_eq!(radio.version(), Ok(0x14));
    assert_eq!(radio.rssi_dbm(), Ok(-102.0));
    assert_eq!(radio.rssi(), Ok(50));
    assert_eq!(radio.tx_fifo_bytes().map(|tx| tx.count), Ok(3));
    let rx = radio.rx_fifo_bytes().unwrap();
    assert!(rx.overflow);
    assert_eq!(rx.count, 1);

    check_expectations(radio);
}

#[test]
fn power_down_goes_through_idle() {
    let bus = Bus::default().strobe(0x36).strobe(0x39);
    let mut radio = setup_radio(bus, &[]);

    radio.power_down().unwrap();

    check_expectations(radio);
}

#[test]
fn default_registers_are_one_burst() {
    let bus = Bus::default().write_burst(0x40, &DEFAULT_CONFIGURATION);
    let mut radio = setup_radio(bus, &[]);

    radio.write_default_registers().unwrap();

    check_expectations(radio);
}

#[test]
fn async_byte_is_sent_msb_first() {
    let levels = [
        State::High,
        State::Low,
        State::High,
        State::Low,
        State::Low,
        State::High,
        State::Low,
        State::High,
        State::Low,
    ];
    let gdo0: Vec<_> = levels.into_iter().map(PinTransaction::set).collect();
    let mut radio = Cc1101::new(
        SpiMock::new(&[]),
        PinMock::new(&gdo0),
        PinMock::new(&[]),
        CheckedDelay::new(&[DelayTransaction::delay_ms(1)]),
    );

    radio.send_async_byte(0xA5).unwrap();

    check_expectations(radio);
}

#[test]
fn packet_in_progress_reads_gdo2() {
    let mut radio = Cc1101::new(
        SpiMock::new(&[]),
        PinMock::new(&[]),
        PinMock::new(&[PinTransaction::get(State::High)]),
        CheckedDelay::new(&[]),
    );

    assert_eq!(radio.packet_in_progress(), Ok(true));

    check_expectations(radio);
}

#[test]
fn wait_for_packet_consumes_a_pending_signal() {
    let signal = PacketSignal::new();
    signal.signal();
    let mut radio = setup_radio(Bus::default(), &[]);

    assert_eq!(radio.wait_for_packet(&signal, 5), Ok(()));
    assert!(!signal.is_pending());

    check_expectations(radio);
}

#[test]
fn wait_for_packet_times_out() {
    let signal = PacketSignal::new();
    let delays = vec![DelayTransaction::delay_ms(1); 3];
    let mut radio = setup_radio(Bus::default(), &delays);

    assert_eq!(radio.wait_for_packet(&signal, 3), Err(Error::Timeout));

    check_expectations(radio);
}

/// GDO2 stand-in that either has already seen its falling edge or never will
struct Gdo2 {
    edge: bool,
}

impl embedded_hal::digital::ErrorType for Gdo2 {
    type Error = Infallible;
}

impl Gdo2 {
    async fn edge(&mut self) -> Result<(), Infallible> {
        if self.edge {
            Ok(())
        } else {
            pending().await
        }
    }
}

impl embedded_hal_async::digital::Wait for Gdo2 {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        self.edge().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        self.edge().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        self.edge().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        self.edge().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        self.edge().await
    }
}

/// Async delay that completes at once, or never
struct Timer {
    expires: bool,
}

impl embedded_hal_async::delay::DelayNs for Timer {
    async fn delay_ns(&mut self, _ns: u32) {
        if !self.expires {
            pending::<()>().await
        }
    }
}

#[test]
fn packet_edge_wins_the_race() {
    let mut radio = Cc1101::new(
        SpiMock::<u8>::new(&[]),
        PinMock::new(&[]),
        Gdo2 { edge: true },
        CheckedDelay::new(&[]),
    );

    let result = embassy_futures::block_on(
        radio.wait_for_packet_edge(&mut Timer { expires: false }, 100),
    );
    assert_eq!(result, Ok(()));

    let (mut spi, mut gdo0, _, mut delay) = radio.release();
    spi.done();
    gdo0.done();
    delay.done();
}

#[test]
fn packet_edge_times_out() {
    let mut radio = Cc1101::new(
        SpiMock::<u8>::new(&[]),
        PinMock::new(&[]),
        Gdo2 { edge: false },
        CheckedDelay::new(&[]),
    );

    let result = embassy_futures::block_on(
        radio.wait_for_packet_edge(&mut Timer { expires: true }, 100),
    );
    assert_eq!(result, Err(Error::Timeout));

    let (mut spi, mut gdo0, _, mut delay) = radio.release();
    spi.done();
    gdo0.done();
    delay.done();
}
