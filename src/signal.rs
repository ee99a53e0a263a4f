//! Packet-received signal
//!
//! With the default IOCFG2 setting GDO2 asserts when a sync word is found and
//! deasserts at the end of the packet, so a falling edge on GDO2 marks a
//! finished RX or TX packet. [`PacketSignal`] is a single slot meant to be
//! set from the GDO2 interrupt handler and consumed by
//! [`Cc1101::wait_for_packet`](crate::Cc1101::wait_for_packet).
//!
//! # Example
//! ```
//! use cc1101::PacketSignal;
//!
//! static PACKET: PacketSignal = PacketSignal::new();
//!
//! // in the GDO2 falling edge handler
//! PACKET.signal();
//! ```

use core::cell::Cell;

use critical_section::Mutex;

/// Single-slot, interrupt safe "packet finished" flag
///
/// Signalling an already set slot has no further effect; one
/// [`take`](PacketSignal::take) consumes any number of edges that arrived
/// since the last take.
pub struct PacketSignal {
    pending: Mutex<Cell<bool>>,
}

impl PacketSignal {
    /// Creates an empty signal
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Marks a packet as finished. Safe to call from interrupt context.
    pub fn signal(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Consumes the signal, returning whether it was set
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).replace(false))
    }

    /// Returns whether the signal is set, without consuming it
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }
}

impl Default for PacketSignal {
    fn default() -> Self {
        Self::new()
    }
}
