// Licensed under the Apache-2.0 license

use crate::i2c::common::{DeviceAddress, Error, PortState};
use crate::i2c::scripted::{Event, Script, ScriptedBus};
use crate::probe::{exit_status, ProbeError, ProbeRunner};
use core::num::NonZeroU8;
use embedded_io::{Write, WriteFmtError};

const ADDR: DeviceAddress = DeviceAddress::new(0x70);
const READ_ADDR: DeviceAddress = DeviceAddress::new(0x71);
const STATUS_ONE: NonZeroU8 = NonZeroU8::MIN;

/// Run the probe scenarios against the scripted driver, reporting each on `uart`.
///
/// # Errors
///
/// Only failures writing to `uart`; a failed scenario panics.
pub fn run_probe_tests<W: Write>(uart: &mut W) -> Result<(), WriteFmtError<W::Error>> {
    writeln!(uart, "\r\n=== I2C Probe Tests ===\r")?;

    test_success_returns_read_byte(uart)?;
    test_open_failure_returns_status(uart)?;
    test_write_failure_leaves_device_open(uart)?;
    test_delays_follow_first_two_writes(uart)?;
    test_read_open_is_unchecked(uart)?;

    writeln!(uart, "\r\n=== All I2C Probe Tests Passed ===\r")?;
    Ok(())
}

fn run(bus: &ScriptedBus) -> Result<u8, ProbeError<Error>> {
    ProbeRunner::new(bus.port(), bus.device(), bus.delay()).run()
}

fn test_success_returns_read_byte<W: Write>(uart: &mut W) -> Result<(), WriteFmtError<W::Error>> {
    write!(uart, "Testing full probe sequence... ")?;

    let bus = ScriptedBus::new(Script::new().read_value(0x3C));
    let result = run(&bus);

    assert_eq!(result, Ok(0x3C));
    assert_eq!(exit_status(&result), 0x3C);
    assert_eq!(bus.events().first(), Some(&Event::Port(PortState::BUS_IDLE)));
    assert_eq!(bus.open_devices(), 0);

    writeln!(uart, "PASSED\r")
}

fn test_open_failure_returns_status<W: Write>(uart: &mut W) -> Result<(), WriteFmtError<W::Error>> {
    write!(uart, "Testing open failure... ")?;

    let bus = ScriptedBus::new(Script::new().fail_open(ADDR, STATUS_ONE));
    let result = run(&bus);

    assert_eq!(exit_status(&result), 1);
    assert_eq!(bus.count(|e| matches!(e, Event::Write(_))), 0);
    assert_eq!(bus.count(|e| matches!(e, Event::Read(_))), 0);
    assert_eq!(bus.count(|e| matches!(e, Event::Close(_))), 0);

    writeln!(uart, "PASSED\r")
}

fn test_write_failure_leaves_device_open<W: Write>(
    uart: &mut W,
) -> Result<(), WriteFmtError<W::Error>> {
    write!(uart, "Testing write failure... ")?;

    let bus = ScriptedBus::new(Script::new().fail_write(0xAA, STATUS_ONE));
    let result = run(&bus);

    assert_eq!(exit_status(&result), 1);
    assert_eq!(bus.count(|e| matches!(e, Event::DelayMs(_))), 0);
    assert_eq!(bus.open_devices(), 1);

    writeln!(uart, "PASSED\r")
}

fn test_delays_follow_first_two_writes<W: Write>(
    uart: &mut W,
) -> Result<(), WriteFmtError<W::Error>> {
    write!(uart, "Testing settle delays... ")?;

    let bus = ScriptedBus::new(Script::new());
    assert!(run(&bus).is_ok());

    let events = bus.events();
    let delays: heapless::Vec<usize, 4> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::DelayMs(1000)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(delays.len(), 2);
    for i in delays {
        assert!(i > 0);
        assert!(matches!(events.get(i - 1), Some(Event::Write(0xAA | 0x55))));
    }

    writeln!(uart, "PASSED\r")
}

fn test_read_open_is_unchecked<W: Write>(uart: &mut W) -> Result<(), WriteFmtError<W::Error>> {
    write!(uart, "Testing unchecked read open... ")?;

    let bus = ScriptedBus::new(
        Script::new()
            .fail_open(READ_ADDR, STATUS_ONE)
            .read_value(0x7E),
    );

    assert_eq!(run(&bus), Ok(0x7E));

    writeln!(uart, "PASSED\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functional_suite_reports_passed() {
        let mut uart: Vec<u8> = Vec::new();

        run_probe_tests(&mut uart).unwrap();

        let report = String::from_utf8(uart).unwrap();
        assert_eq!(report.matches("PASSED").count(), 5);
        assert!(report.ends_with("=== All I2C Probe Tests Passed ===\r\n"));
    }
}
