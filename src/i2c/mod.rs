// Licensed under the Apache-2.0 license

//! I2C driver seams for the SC126 probe harness.
//!
//! The bit-banged driver itself lives outside this crate. This module defines
//! the calls the harness makes into it, the values those calls exchange, and
//! two implementations of the seam: an adapter over any embedded-hal
//! controller and a scripted driver for tests.

pub mod common;
pub mod hal_device;
pub mod scripted;
pub mod traits;

pub use common::{DeviceAddress, Error, PortState, StatusCode};
pub use traits::{DeviceHandle, I2cDevice, OpenFailure, PortControl};
