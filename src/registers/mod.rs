//! Register definitions for the CC1101
//!
//! [`map`] holds the raw address catalogue. The remaining modules describe the
//! configuration and status registers the driver touches as typed `regiface`
//! registers, one struct per register (or per run of consecutive registers
//! that are always accessed together, like the frequency word).
//!
//! Every typed configuration register models all of its used bits, so a
//! read-modify-write through [`Device::modify_register`](crate::Device::modify_register)
//! leaves fields it does not touch exactly as the chip reported them.
//!
//! Registers with more than one field also publish each field as a [`Field`]
//! constant. [`Device::write_field`](crate::Device::write_field) updates one
//! field on the raw byte and works even when a neighbouring field holds a
//! value the typed register cannot decode.

use self::map::Address;
use crate::{convert, Error};

/// A raw field value that does not correspond to any variant of its enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidValue(pub u8);

/// A bit field inside one configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register holding the field
    pub address: Address,
    /// Width in bits
    pub width: u8,
    /// Position of the least significant bit
    pub offset: u8,
}

impl Field {
    /// Describes a `width`-bit field at bit `offset` of `address`
    pub const fn new(address: Address, width: u8, offset: u8) -> Self {
        Self {
            address,
            width,
            offset,
        }
    }

    /// Extracts the field from a register byte
    pub const fn get(self, byte: u8) -> u8 {
        convert::field(byte, self.width, self.offset)
    }

    /// Replaces the field in a register byte, keeping every other bit.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - `value` does not fit in the field
    pub fn set(self, byte: u8, value: u8) -> Result<u8, Error> {
        convert::set_field(byte, value, self.width, self.offset)
    }

    /// Checks that `value` fits in the field
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] - `value` does not fit in the field
    pub fn check(self, value: u8) -> Result<u8, Error> {
        convert::check_field(value, self.width)
    }
}

/// Configuration register: read/write, single or burst addressed
pub trait ConfigRegister: regiface::Register<IdType = u8> {}

/// Status register: read only, always burst addressed
pub trait StatusRegister: regiface::ReadableRegister<IdType = u8> {}

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::registers::InvalidValue;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(v if v == $value => Ok(Self::$variant),)+
                    invalid => Err($crate::registers::InvalidValue(invalid)),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }
    };
}

pub mod map;

mod control;
mod frequency;
mod modem;
mod packet;
mod patable;
mod status;

pub use control::*;
pub use frequency::*;
pub use modem::*;
pub use packet::*;
pub use patable::*;
pub use status::*;
