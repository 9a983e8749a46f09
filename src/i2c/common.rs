// Licensed under the Apache-2.0 license

//! Common types and constants for the SC126 I2C probe.
//!
//! This module provides the values exchanged with the bit-banged driver
//! (addresses, port state, status codes) and the fixed probe constants.

use core::fmt;
use core::num::NonZeroU8;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use fugit::MillisDurationU32;

/// Write address of the device exercised by the SC126 harness.
pub const I2C_ADDR: u8 = 0x70;
/// SCL and SDA high plus LED 1.
pub const I2C_IO_PORTS: u8 = 0b1100_0000;
/// Bytes written to the device, in order.
pub const PROBE_PATTERN: [u8; 3] = [0xAA, 0x55, 0xFF];
/// Settling time after the first and second probe bytes.
pub const SETTLE_DELAY: MillisDurationU32 = MillisDurationU32::millis(1000);

const fn status(code: u8) -> NonZeroU8 {
    match NonZeroU8::new(code) {
        Some(code) => code,
        None => NonZeroU8::MAX,
    }
}

pub const STATUS_NO_ACK: NonZeroU8 = status(1);
pub const STATUS_BUS_ERROR: NonZeroU8 = status(2);
pub const STATUS_ARBITRATION_LOSS: NonZeroU8 = status(3);
pub const STATUS_OVERRUN: NonZeroU8 = status(4);
pub const STATUS_OTHER: NonZeroU8 = status(0xFF);

/// 8-bit bus address; bit 0 selects the direction (0 = write, 1 = read).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Read address paired with this write address.
    ///
    /// The driver convention is plain `+ 1`; the addition wraps so that
    /// `0xFF` does not overflow.
    #[must_use]
    pub const fn read_address(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub const fn is_read(self) -> bool {
        self.0 & 0x01 != 0
    }

    /// 7-bit address as embedded-hal expects it.
    #[must_use]
    pub const fn seven_bit(self) -> u8 {
        self.0 >> 1
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self(I2C_ADDR)
    }
}

impl From<u8> for DeviceAddress {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Level of the I2C port-control register: bus lines plus indicator LEDs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PortState(u8);

impl PortState {
    pub const SCL: u8 = 0b1000_0000;
    pub const SDA: u8 = 0b0100_0000;

    /// Bus released (SCL and SDA high) with LED 1.
    pub const BUS_IDLE: Self = Self(I2C_IO_PORTS);

    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn scl_high(self) -> bool {
        self.0 & Self::SCL != 0
    }

    #[must_use]
    pub const fn sda_high(self) -> bool {
        self.0 & Self::SDA != 0
    }
}

impl Default for PortState {
    fn default() -> Self {
        Self::BUS_IDLE
    }
}

/// Non-zero status reported by a failed driver call.
pub trait StatusCode {
    fn status_code(&self) -> NonZeroU8;
}

/// Driver error.
///
/// `Status` carries a raw code straight from the bit-banged driver. The other
/// variants come from embedded-hal controllers and map to fixed codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    NoAcknowledge(NoAcknowledgeSource),
    Bus,
    ArbitrationLoss,
    Overrun,
    Other,
    Status(NonZeroU8),
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match *self {
            Error::NoAcknowledge(source) => ErrorKind::NoAcknowledge(source),
            Error::Bus => ErrorKind::Bus,
            Error::ArbitrationLoss => ErrorKind::ArbitrationLoss,
            Error::Overrun => ErrorKind::Overrun,
            Error::Other | Error::Status(_) => ErrorKind::Other,
        }
    }
}

impl StatusCode for Error {
    fn status_code(&self) -> NonZeroU8 {
        match *self {
            Error::NoAcknowledge(_) => STATUS_NO_ACK,
            Error::Bus => STATUS_BUS_ERROR,
            Error::ArbitrationLoss => STATUS_ARBITRATION_LOSS,
            Error::Overrun => STATUS_OVERRUN,
            Error::Other => STATUS_OTHER,
            Error::Status(code) => code,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(source) => Error::NoAcknowledge(source),
            ErrorKind::Bus => Error::Bus,
            ErrorKind::ArbitrationLoss => Error::ArbitrationLoss,
            ErrorKind::Overrun => Error::Overrun,
            _ => Error::Other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoAcknowledge(source) => write!(f, "no acknowledge ({source})"),
            Error::Bus => f.write_str("bus error"),
            Error::ArbitrationLoss => f.write_str("arbitration lost"),
            Error::Overrun => f.write_str("overrun"),
            Error::Other => f.write_str("driver error"),
            Error::Status(code) => write!(f, "driver status {code}"),
        }
    }
}

impl core::error::Error for Error {}
