//! Command strobes
//!
//! The CC1101 has no parameterized commands. Every state change is a
//! single-byte strobe, see [`Strobe`]. After a strobe the chip moves through
//! transient states before settling, so callers that depend on the result
//! poll MARCSTATE (see [`Cc1101::wait_for_state`](crate::Cc1101::wait_for_state)).

mod strobe;

pub use strobe::*;
