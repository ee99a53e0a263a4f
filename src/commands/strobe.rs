//! Command strobes
//!
//! A strobe is a single header byte in 0x30..=0x3D sent without the burst
//! bit. It triggers an internal action and carries no data. The same
//! addresses read as status registers when the burst bit is set.

/// Command strobe opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Strobe {
    /// Reset chip
    Sres = 0x30,
    /// Enable and calibrate the frequency synthesizer
    Sfstxon = 0x31,
    /// Turn off the crystal oscillator
    Sxoff = 0x32,
    /// Calibrate the frequency synthesizer and turn it off
    Scal = 0x33,
    /// Enable RX
    Srx = 0x34,
    /// Enable TX. In RX with CCA enabled, only go to TX if the channel is clear
    Stx = 0x35,
    /// Exit RX/TX, turn off the frequency synthesizer
    Sidle = 0x36,
    /// Automatic frequency compensation
    Safc = 0x37,
    /// Start automatic RX polling (wake on radio)
    Swor = 0x38,
    /// Enter power down mode when CSn goes high
    Spwd = 0x39,
    /// Flush the RX FIFO. Only issue in IDLE or RXFIFO_OVERFLOW
    Sfrx = 0x3A,
    /// Flush the TX FIFO. Only issue in IDLE or TXFIFO_UNDERFLOW
    Sftx = 0x3B,
    /// Reset the real time clock to Event1
    Sworrst = 0x3C,
    /// No operation, returns the status byte
    Snop = 0x3D,
}

impl Strobe {
    /// Header byte sent on the bus
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

impl From<Strobe> for u8 {
    fn from(strobe: Strobe) -> Self {
        strobe.opcode()
    }
}
