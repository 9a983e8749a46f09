// Licensed under the Apache-2.0 license

//! SC126 I2C probe sequence.
//!
//! Drives the port lines to idle, opens the device for write, writes
//! `AA 55 FF` with a one second settle after the first two bytes, closes,
//! then reopens the device at the read address and reads back one byte.
//!
//! Only the write-phase open and the pattern writes are checked. A failure
//! there aborts the run immediately and the device is left open. The read
//! phase open and both closes are best-effort and their status is dropped.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{DeviceAddress, PortState, StatusCode, PROBE_PATTERN, SETTLE_DELAY};
use crate::i2c::traits::{DeviceHandle, I2cDevice, OpenFailure, PortControl};
use core::fmt;
use core::num::NonZeroU8;
use embedded_hal::delay::DelayNs;

/// Checked step that aborted the probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProbeError<E> {
    Open { address: DeviceAddress, source: E },
    Write { byte: u8, source: E },
}

impl<E> ProbeError<E> {
    pub fn driver_error(&self) -> &E {
        match self {
            ProbeError::Open { source, .. } | ProbeError::Write { source, .. } => source,
        }
    }
}

impl<E: StatusCode> ProbeError<E> {
    /// Driver status of the failed call.
    pub fn status_code(&self) -> NonZeroU8 {
        self.driver_error().status_code()
    }
}

impl<E: fmt::Display> fmt::Display for ProbeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Open { address, source } => write!(f, "open {address} failed: {source}"),
            ProbeError::Write { byte, source } => {
                write!(f, "write 0x{byte:02X} failed: {source}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for ProbeError<E> {}

/// Process status for a probe result: the byte read back, or the non-zero
/// status of the call that failed.
pub fn exit_status<E: StatusCode>(result: &Result<u8, ProbeError<E>>) -> i32 {
    match result {
        Ok(value) => i32::from(*value),
        Err(e) => i32::from(e.status_code().get()),
    }
}

pub struct ProbeRunner<P, D, T, L = NoOpLogger>
where
    P: PortControl,
    D: I2cDevice,
    T: DelayNs,
    L: Logger,
{
    pub port: P,
    pub device: D,
    pub delay: T,
    pub logger: L,
    address: DeviceAddress,
}

impl<P, D, T> ProbeRunner<P, D, T>
where
    P: PortControl,
    D: I2cDevice,
    T: DelayNs,
{
    /// Runner for the stock SC126 harness at write address 0x70.
    pub fn new(port: P, device: D, delay: T) -> Self {
        Self::with_address(port, device, delay, DeviceAddress::default())
    }

    /// Runner for a device at write `address`; reads go to `address + 1`.
    pub fn with_address(port: P, device: D, delay: T, address: DeviceAddress) -> Self {
        Self {
            port,
            device,
            delay,
            logger: NoOpLogger,
            address,
        }
    }
}

impl<P, D, T, L> ProbeRunner<P, D, T, L>
where
    P: PortControl,
    D: I2cDevice,
    T: DelayNs,
    L: Logger,
{
    pub fn with_logger<L2: Logger>(self, logger: L2) -> ProbeRunner<P, D, T, L2> {
        ProbeRunner {
            port: self.port,
            device: self.device,
            delay: self.delay,
            logger,
            address: self.address,
        }
    }

    /// Run the probe once and return the byte read back.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the write-phase open or of one of the
    /// three writes. No further driver calls are made after it.
    pub fn run(&mut self) -> Result<u8, ProbeError<D::Error>> {
        let address = self.address;

        self.logger
            .debug(format_args!("port <- 0x{:02X}", PortState::BUS_IDLE.raw()));
        self.port.write_port(PortState::BUS_IDLE);

        self.logger.debug(format_args!("open {address} for write"));
        let device = self.device.open(address).map_err(|failure| {
            self.logger.error(format_args!("open {address} failed"));
            ProbeError::Open {
                address,
                source: failure.into_error(),
            }
        })?;

        let [first, second, third] = PROBE_PATTERN;
        self.write_byte(&device, first)?;
        self.delay.delay_ms(SETTLE_DELAY.to_millis());
        self.write_byte(&device, second)?;
        self.delay.delay_ms(SETTLE_DELAY.to_millis());
        self.write_byte(&device, third)?;
        let _ = self.device.close(device);

        let read_address = address.read_address();
        self.logger.debug(format_args!("open {read_address} for read"));
        let device = self
            .device
            .open(read_address)
            .unwrap_or_else(OpenFailure::into_handle);
        let value = self.device.read(&device);
        let _ = self.device.close(device);

        self.logger.debug(format_args!("read 0x{value:02X}"));
        Ok(value)
    }

    fn write_byte(
        &mut self,
        device: &DeviceHandle,
        byte: u8,
    ) -> Result<(), ProbeError<D::Error>> {
        self.logger.debug(format_args!("write 0x{byte:02X}"));
        self.device.write(device, byte).map_err(|source| {
            self.logger.error(format_args!(
                "write 0x{byte:02X} failed, {} left open",
                device.address()
            ));
            ProbeError::Write { byte, source }
        })
    }

    /// Run the probe once and return its process status.
    pub fn run_status(&mut self) -> i32 {
        exit_status(&self.run())
    }

    pub fn release(self) -> (P, D, T) {
        (self.port, self.device, self.delay)
    }
}
