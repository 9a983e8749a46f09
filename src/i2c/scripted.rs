// Licensed under the Apache-2.0 license

//! Scripted stand-in for the bit-banged driver.
//!
//! [`ScriptedBus`] records every port, device and delay call into one ordered
//! transcript and fails the calls its [`Script`] names. The port, device and
//! delay views borrow the same bus, so one transcript shows how the calls of
//! all three collaborators interleave. Works without `std`.

use crate::i2c::common::{DeviceAddress, Error, PortState};
use crate::i2c::traits::{DeviceHandle, I2cDevice, OpenFailure, PortControl};
use core::cell::{Cell, RefCell};
use core::num::NonZeroU8;
use embedded_hal::delay::DelayNs;
use heapless::Vec;

pub const MAX_EVENTS: usize = 32;

/// One collaborator call as seen by the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Port(PortState),
    Open(DeviceAddress),
    Write(u8),
    Read(u8),
    Close(DeviceAddress),
    DelayMs(u32),
    DelayNs(u32),
}

/// Which calls fail, and what the read returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    open_failure: Option<(DeviceAddress, NonZeroU8)>,
    write_failure: Option<(u8, NonZeroU8)>,
    close_failure: Option<NonZeroU8>,
    read_value: u8,
}

impl Script {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open_failure: None,
            write_failure: None,
            close_failure: None,
            read_value: 0,
        }
    }
    #[must_use]
    pub const fn fail_open(mut self, address: DeviceAddress, code: NonZeroU8) -> Self {
        self.open_failure = Some((address, code));
        self
    }
    /// Fail every write of `byte`.
    #[must_use]
    pub const fn fail_write(mut self, byte: u8, code: NonZeroU8) -> Self {
        self.write_failure = Some((byte, code));
        self
    }
    #[must_use]
    pub const fn fail_close(mut self, code: NonZeroU8) -> Self {
        self.close_failure = Some(code);
        self
    }
    #[must_use]
    pub const fn read_value(mut self, value: u8) -> Self {
        self.read_value = value;
        self
    }
}

pub struct ScriptedBus {
    script: Script,
    events: RefCell<Vec<Event, MAX_EVENTS>>,
    open_devices: Cell<usize>,
    overflowed: Cell<bool>,
}

impl ScriptedBus {
    #[must_use]
    pub const fn new(script: Script) -> Self {
        Self {
            script,
            events: RefCell::new(Vec::new()),
            open_devices: Cell::new(0),
            overflowed: Cell::new(false),
        }
    }

    pub fn port(&self) -> ScriptedPort<'_> {
        ScriptedPort { bus: self }
    }

    pub fn device(&self) -> ScriptedDevice<'_> {
        ScriptedDevice { bus: self }
    }

    pub fn delay(&self) -> ScriptedDelay<'_> {
        ScriptedDelay { bus: self }
    }

    /// Snapshot of the transcript so far.
    pub fn events(&self) -> Vec<Event, MAX_EVENTS> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Devices opened and not yet closed.
    pub fn open_devices(&self) -> usize {
        self.open_devices.get()
    }

    /// True once the transcript dropped an event for lack of room.
    pub fn overflowed(&self) -> bool {
        self.overflowed.get()
    }

    fn record(&self, event: Event) {
        if self.events.borrow_mut().push(event).is_err() {
            self.overflowed.set(true);
        }
    }
}

pub struct ScriptedPort<'a> {
    bus: &'a ScriptedBus,
}

impl PortControl for ScriptedPort<'_> {
    fn write_port(&mut self, state: PortState) {
        self.bus.record(Event::Port(state));
    }
}

pub struct ScriptedDevice<'a> {
    bus: &'a ScriptedBus,
}

impl I2cDevice for ScriptedDevice<'_> {
    type Error = Error;

    fn open(&mut self, address: DeviceAddress) -> Result<DeviceHandle, OpenFailure<Error>> {
        self.bus.record(Event::Open(address));
        self.bus.open_devices.set(self.bus.open_devices.get() + 1);
        let handle = DeviceHandle::new(address);
        match self.bus.script.open_failure {
            Some((failing, code)) if failing == address => Err(OpenFailure {
                handle,
                error: Error::Status(code),
            }),
            _ => Ok(handle),
        }
    }

    fn write(&mut self, _device: &DeviceHandle, byte: u8) -> Result<(), Error> {
        self.bus.record(Event::Write(byte));
        match self.bus.script.write_failure {
            Some((failing, code)) if failing == byte => Err(Error::Status(code)),
            _ => Ok(()),
        }
    }

    fn read(&mut self, _device: &DeviceHandle) -> u8 {
        let value = self.bus.script.read_value;
        self.bus.record(Event::Read(value));
        value
    }

    fn close(&mut self, device: DeviceHandle) -> Result<(), Error> {
        self.bus.record(Event::Close(device.address()));
        self.bus
            .open_devices
            .set(self.bus.open_devices.get().saturating_sub(1));
        match self.bus.script.close_failure {
            Some(code) => Err(Error::Status(code)),
            None => Ok(()),
        }
    }
}

pub struct ScriptedDelay<'a> {
    bus: &'a ScriptedBus,
}

impl DelayNs for ScriptedDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.bus.record(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.bus.record(Event::DelayMs(ms));
    }
}
