//! Register map
//!
//! Addresses of every configuration and status register, the header flag
//! bits of the SPI address byte and the factory default configuration block.
//!
//! The CC1101 shares the 0x30..0x3D address space between command strobes and
//! status registers. A status register is only reached when the burst bit is
//! set in the header byte, which is why status reads always go through
//! [`READ_BURST`].

/// Header flag for a burst write
pub const WRITE_BURST: u8 = 0x40;
/// Header flag for a single-byte read
pub const READ_SINGLE: u8 = 0x80;
/// Header flag for a burst read (and any status register read)
pub const READ_BURST: u8 = 0xC0;

/// Power amplifier table (8 bytes, burst access)
pub const PATABLE: u8 = 0x3E;
/// TX FIFO when written, RX FIFO when read
pub const FIFO: u8 = 0x3F;
/// Size of each of the TX and RX FIFOs in bytes
pub const FIFO_SIZE: usize = 64;

/// Configuration registers (read/write, 0x00..=0x2E)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Address {
    /// GDO2 output pin configuration
    Iocfg2 = 0x00,
    /// GDO1 output pin configuration
    Iocfg1 = 0x01,
    /// GDO0 output pin configuration
    Iocfg0 = 0x02,
    /// RX FIFO and TX FIFO thresholds
    Fifothr = 0x03,
    /// Sync word, high byte
    Sync1 = 0x04,
    /// Sync word, low byte
    Sync0 = 0x05,
    /// Packet length
    Pktlen = 0x06,
    /// Packet automation control
    Pktctrl1 = 0x07,
    /// Packet automation control
    Pktctrl0 = 0x08,
    /// Device address
    Addr = 0x09,
    /// Channel number
    Channr = 0x0A,
    /// Frequency synthesizer control
    Fsctrl1 = 0x0B,
    /// Frequency synthesizer control
    Fsctrl0 = 0x0C,
    /// Frequency control word, high byte
    Freq2 = 0x0D,
    /// Frequency control word, middle byte
    Freq1 = 0x0E,
    /// Frequency control word, low byte
    Freq0 = 0x0F,
    /// Modem configuration
    Mdmcfg4 = 0x10,
    /// Modem configuration
    Mdmcfg3 = 0x11,
    /// Modem configuration
    Mdmcfg2 = 0x12,
    /// Modem configuration
    Mdmcfg1 = 0x13,
    /// Modem configuration
    Mdmcfg0 = 0x14,
    /// Modem deviation setting
    Deviatn = 0x15,
    /// Main radio control state machine configuration
    Mcsm2 = 0x16,
    /// Main radio control state machine configuration
    Mcsm1 = 0x17,
    /// Main radio control state machine configuration
    Mcsm0 = 0x18,
    /// Frequency offset compensation configuration
    Foccfg = 0x19,
    /// Bit synchronization configuration
    Bscfg = 0x1A,
    /// AGC control
    Agcctrl2 = 0x1B,
    /// AGC control
    Agcctrl1 = 0x1C,
    /// AGC control
    Agcctrl0 = 0x1D,
    /// High byte event 0 timeout
    Worevt1 = 0x1E,
    /// Low byte event 0 timeout
    Worevt0 = 0x1F,
    /// Wake on radio control
    Worctrl = 0x20,
    /// Front end RX configuration
    Frend1 = 0x21,
    /// Front end TX configuration
    Frend0 = 0x22,
    /// Frequency synthesizer calibration
    Fscal3 = 0x23,
    /// Frequency synthesizer calibration
    Fscal2 = 0x24,
    /// Frequency synthesizer calibration
    Fscal1 = 0x25,
    /// Frequency synthesizer calibration
    Fscal0 = 0x26,
    /// RC oscillator configuration
    Rcctrl1 = 0x27,
    /// RC oscillator configuration
    Rcctrl0 = 0x28,
    /// Frequency synthesizer calibration control
    Fstest = 0x29,
    /// Production test
    Ptest = 0x2A,
    /// AGC test
    Agctest = 0x2B,
    /// Various test settings
    Test2 = 0x2C,
    /// Various test settings
    Test1 = 0x2D,
    /// Various test settings
    Test0 = 0x2E,
}

impl Address {
    /// Raw address byte without any header flags
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.addr()
    }
}

/// Status registers (read only, 0x30..=0x3D, burst addressed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StatusAddress {
    /// Chip part number
    Partnum = 0x30,
    /// Chip version number
    Version = 0x31,
    /// Frequency offset estimate from demodulator
    Freqest = 0x32,
    /// Demodulator estimate for link quality
    Lqi = 0x33,
    /// Received signal strength indication
    Rssi = 0x34,
    /// Main radio control state machine state
    Marcstate = 0x35,
    /// High byte of WOR time
    Wortime1 = 0x36,
    /// Low byte of WOR time
    Wortime0 = 0x37,
    /// Current GDOx status and packet status
    Pktstatus = 0x38,
    /// Current setting from PLL calibration module
    VcoVcDac = 0x39,
    /// Underflow and number of bytes in the TX FIFO
    Txbytes = 0x3A,
    /// Overflow and number of bytes in the RX FIFO
    Rxbytes = 0x3B,
    /// Last RC oscillator calibration result
    Rcctrl1Status = 0x3C,
    /// Last RC oscillator calibration result
    Rcctrl0Status = 0x3D,
}

impl StatusAddress {
    /// Raw address byte without any header flags
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<StatusAddress> for u8 {
    fn from(address: StatusAddress) -> Self {
        address.addr()
    }
}

/// Number of configuration registers written by the default block
pub const CONFIG_REGISTER_COUNT: usize = Address::Test0 as usize + 1;

/// Default values for configuration registers 0x00..=0x2E, in address order.
///
/// GFSK at 433.92 MHz, 1.2 kBaud, variable packet length with CRC. GDO2
/// asserts when a sync word is seen and deasserts at the end of the packet,
/// so its falling edge marks a finished packet. The radio returns to IDLE
/// after both TX and RX.
pub const DEFAULT_CONFIGURATION: [u8; CONFIG_REGISTER_COUNT] = [
    0x06, // IOCFG2
    0x2E, // IOCFG1
    0x2E, // IOCFG0
    0x47, // FIFOTHR
    0xD3, // SYNC1
    0x91, // SYNC0
    0xFF, // PKTLEN
    0x04, // PKTCTRL1
    0x05, // PKTCTRL0
    0x00, // ADDR
    0x00, // CHANNR
    0x06, // FSCTRL1
    0x00, // FSCTRL0
    0x10, // FREQ2
    0xB0, // FREQ1
    0x71, // FREQ0
    0xF5, // MDMCFG4
    0x83, // MDMCFG3
    0x13, // MDMCFG2
    0x22, // MDMCFG1
    0xF8, // MDMCFG0
    0x15, // DEVIATN
    0x07, // MCSM2
    0x30, // MCSM1
    0x18, // MCSM0
    0x16, // FOCCFG
    0x6C, // BSCFG
    0x03, // AGCCTRL2
    0x40, // AGCCTRL1
    0x91, // AGCCTRL0
    0x87, // WOREVT1
    0x6B, // WOREVT0
    0xFB, // WORCTRL
    0x56, // FREND1
    0x10, // FREND0
    0xE9, // FSCAL3
    0x2A, // FSCAL2
    0x00, // FSCAL1
    0x1F, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x35, // TEST1
    0x09, // TEST0
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_covers_every_config_register() {
        assert_eq!(CONFIG_REGISTER_COUNT, 0x2F);
        assert_eq!(DEFAULT_CONFIGURATION[Address::Mcsm1.addr() as usize], 0x30);
        assert_eq!(DEFAULT_CONFIGURATION[Address::Freq2.addr() as usize], 0x10);
    }

    #[test]
    fn status_addresses_share_strobe_space() {
        assert_eq!(StatusAddress::Marcstate.addr() | READ_BURST, 0xF5);
        assert_eq!(StatusAddress::Partnum.addr() | READ_BURST, 0xF0);
        assert_eq!(FIFO | WRITE_BURST, 0x7F);
    }
}
