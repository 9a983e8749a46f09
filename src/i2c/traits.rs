// Licensed under the Apache-2.0 license

//! # I2C Driver Seams
//!
//! The probe harness talks to the bit-banged driver through two small traits:
//!
//! ```text
//! PortControl   raw port-control register (bus lines + LEDs)
//! I2cDevice     open / write / read / close on one device
//! ```
//!
//! An open device is represented by a [`DeviceHandle`] returned from
//! [`I2cDevice::open`] and handed back to every later call. `close` consumes
//! the handle. A handle dropped without `close` marks a device the caller left
//! open, which the harness does on its write failure path.

use crate::i2c::common::{DeviceAddress, PortState, StatusCode};
use core::fmt::Debug;

/// Token for a device that has been opened (start condition plus address).
#[must_use = "a device left open keeps the bus claimed; pass the handle to close()"]
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceHandle {
    address: DeviceAddress,
}

impl DeviceHandle {
    /// Handle for `address`. Only drivers mint handles.
    pub const fn new(address: DeviceAddress) -> Self {
        Self { address }
    }

    #[must_use]
    pub const fn address(&self) -> DeviceAddress {
        self.address
    }
}

/// A failed `open`.
///
/// The driver still asserted a start condition and sent the address, so the
/// failure carries the handle. Callers that treat the open as best-effort can
/// keep using it; everyone else propagates `error`.
#[derive(Debug, PartialEq, Eq)]
pub struct OpenFailure<E> {
    pub handle: DeviceHandle,
    pub error: E,
}

impl<E> OpenFailure<E> {
    pub fn into_handle(self) -> DeviceHandle {
        self.handle
    }

    pub fn into_error(self) -> E {
        self.error
    }
}

/// Port-control register of the I2C interface.
pub trait PortControl {
    /// Drive the port to `state`. The register write cannot fail.
    fn write_port(&mut self, state: PortState);
}

/// Device-level operations of the I2C driver.
pub trait I2cDevice {
    /// Driver error carrying the driver's non-zero status.
    type Error: StatusCode + Debug;

    /// Assert a start condition and send `address` (direction in bit 0).
    ///
    /// # Errors
    ///
    /// Fails when the device does not acknowledge or the bus is busy.
    fn open(&mut self, address: DeviceAddress) -> Result<DeviceHandle, OpenFailure<Self::Error>>;

    /// Send one byte to the open device.
    ///
    /// # Errors
    ///
    /// Fails when the device does not acknowledge the byte.
    fn write(&mut self, device: &DeviceHandle, byte: u8) -> Result<(), Self::Error>;

    /// Receive one byte from the open device. The driver reports no failure.
    fn read(&mut self, device: &DeviceHandle) -> u8;

    /// Send a stop condition and release the bus.
    ///
    /// # Errors
    ///
    /// Driver specific; the harness ignores the result.
    fn close(&mut self, device: DeviceHandle) -> Result<(), Self::Error>;
}

impl<T: PortControl + ?Sized> PortControl for &mut T {
    fn write_port(&mut self, state: PortState) {
        T::write_port(self, state);
    }
}

impl<T: I2cDevice + ?Sized> I2cDevice for &mut T {
    type Error = T::Error;

    fn open(&mut self, address: DeviceAddress) -> Result<DeviceHandle, OpenFailure<Self::Error>> {
        T::open(self, address)
    }

    fn write(&mut self, device: &DeviceHandle, byte: u8) -> Result<(), Self::Error> {
        T::write(self, device, byte)
    }

    fn read(&mut self, device: &DeviceHandle) -> u8 {
        T::read(self, device)
    }

    fn close(&mut self, device: DeviceHandle) -> Result<(), Self::Error> {
        T::close(self, device)
    }
}
