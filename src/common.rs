// Licensed under the Apache-2.0 license

//! Logging seam shared by the probe harness.
//!
//! Components take a `L: Logger` type parameter that defaults to
//! [`NoOpLogger`], so the silent build carries no formatting code. Attach a
//! [`UartLogger`] to trace each step over a serial console.

use core::fmt;

/// Sink for harness diagnostics.
pub trait Logger {
    fn debug(&mut self, args: fmt::Arguments<'_>);
    fn error(&mut self, args: fmt::Arguments<'_>);
}

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}
    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Logger writing `\r\n` terminated lines to a serial port.
///
/// Write errors on the port are dropped: a broken console must not change
/// the outcome of the probe.
pub struct UartLogger<W: embedded_io::Write> {
    uart: W,
}

impl<W: embedded_io::Write> UartLogger<W> {
    pub fn new(uart: W) -> Self {
        Self { uart }
    }

    /// Give the port back.
    pub fn release(self) -> W {
        self.uart
    }

    fn line(&mut self, level: &str, args: fmt::Arguments<'_>) {
        let _ = write!(self.uart, "[{level}] {args}\r\n");
    }
}

impl<W: embedded_io::Write> Logger for UartLogger<W> {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.line("DEBUG", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.line("ERROR", args);
    }
}
