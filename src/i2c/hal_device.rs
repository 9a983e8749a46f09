// Licensed under the Apache-2.0 license

//! Adapter running the probe on any embedded-hal I2C controller.
//!
//! embedded-hal controllers only expose whole transactions, so each driver
//! call becomes one transaction on the 7-bit address:
//!
//! - `open` for write sends a zero-length write to check for an address ACK;
//!   `open` for read generates no bus traffic
//! - `write` is a one-byte write
//! - `read` is a one-byte read
//! - `close` has nothing left to release

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{DeviceAddress, Error};
use crate::i2c::traits::{DeviceHandle, I2cDevice, OpenFailure};
use embedded_hal::i2c::{Error as _, I2c};

/// Byte reported when a read transaction fails: an idle, pulled-up bus.
pub const IDLE_BUS_BYTE: u8 = 0xFF;

pub struct HalDevice<I: I2c, L: Logger = NoOpLogger> {
    pub hardware: I,
    pub logger: L,
}

impl<I: I2c> HalDevice<I> {
    pub fn new(hardware: I) -> Self {
        Self {
            hardware,
            logger: NoOpLogger,
        }
    }
}

impl<I: I2c, L: Logger> HalDevice<I, L> {
    pub fn with_logger(hardware: I, logger: L) -> Self {
        Self { hardware, logger }
    }

    pub fn release(self) -> I {
        self.hardware
    }
}

impl<I: I2c, L: Logger> I2cDevice for HalDevice<I, L> {
    type Error = Error;

    fn open(&mut self, address: DeviceAddress) -> Result<DeviceHandle, OpenFailure<Error>> {
        let handle = DeviceHandle::new(address);
        if address.is_read() {
            return Ok(handle);
        }
        match self.hardware.write(address.seven_bit(), &[]) {
            Ok(()) => Ok(handle),
            Err(e) => {
                let error = Error::from(e.kind());
                self.logger
                    .error(format_args!("i2c: no response at {address}: {error}"));
                Err(OpenFailure { handle, error })
            }
        }
    }

    fn write(&mut self, device: &DeviceHandle, byte: u8) -> Result<(), Error> {
        self.hardware
            .write(device.address().seven_bit(), &[byte])
            .map_err(|e| Error::from(e.kind()))
    }

    fn read(&mut self, device: &DeviceHandle) -> u8 {
        let mut buffer = [IDLE_BUS_BYTE];
        if let Err(e) = self.hardware.read(device.address().seven_bit(), &mut buffer) {
            let error = Error::from(e.kind());
            self.logger.error(format_args!(
                "i2c: read from {} failed: {error}",
                device.address()
            ));
            return IDLE_BUS_BYTE;
        }
        let [byte] = buffer;
        byte
    }

    fn close(&mut self, _device: DeviceHandle) -> Result<(), Error> {
        Ok(())
    }
}
