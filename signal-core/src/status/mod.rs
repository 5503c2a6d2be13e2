//! Status report shared by every front-end.
//!
//! [`StatusFormatter`] renders a [`StatusSnapshot`] as the fixed three-line
//! report, [`StatusReader`] serves that report through a read-once session
//! the way a character device would.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use crate::controller::{Mode, SharedController};
use crate::sequences::LightOutputs;

/// Capacity of a rendered report; the longest one is 72 bytes.
pub const STATUS_CAPACITY: usize = 96;

/// Rendered status report.
pub type StatusText = String<STATUS_CAPACITY>;

/// Consistent view of the values the report shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub mode: Mode,
    pub rate_hz: u8,
    pub outputs: LightOutputs,
}

impl StatusSnapshot {
    #[must_use]
    pub const fn new(mode: Mode, rate_hz: u8, outputs: LightOutputs) -> Self {
        Self {
            mode,
            rate_hz,
            outputs,
        }
    }

    /// Renders the full report into a bounded buffer.
    #[must_use]
    pub fn render(&self) -> StatusText {
        let mut text = StatusText::new();
        // STATUS_CAPACITY exceeds the longest possible report.
        let _ = StatusFormatter::new(self).write_report(&mut text);
        text
    }
}

/// Helper that renders a [`StatusSnapshot`] into human-readable lines.
#[derive(Clone, Copy, Debug)]
pub struct StatusFormatter<'a> {
    snapshot: &'a StatusSnapshot,
}

impl<'a> StatusFormatter<'a> {
    /// Creates a new formatter for the provided snapshot.
    #[must_use]
    pub const fn new(snapshot: &'a StatusSnapshot) -> Self {
        Self { snapshot }
    }

    /// Writes all three lines, each terminated by `\n`.
    pub fn write_report<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        self.write_mode_line(writer)?;
        writer.write_char('\n')?;
        self.write_rate_line(writer)?;
        writer.write_char('\n')?;
        self.write_lights_line(writer)?;
        writer.write_char('\n')
    }

    /// Writes the mode line (e.g. `mode: flashing-red`).
    pub fn write_mode_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "mode: {}", self.snapshot.mode)
    }

    /// Writes the rate line (e.g. `rate: 4 Hz`).
    pub fn write_rate_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "rate: {} Hz", self.snapshot.rate_hz)
    }

    /// Writes the lamp line (e.g. `lights: red off, yellow off, green on`).
    pub fn write_lights_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "lights: {}", self.snapshot.outputs)
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StatusFormatter::new(self).write_report(f)
    }
}

/// One status-read session.
///
/// The first [`read`](Self::read) snapshots the controller and copies as much
/// of the report as fits; every later read reports end of data. Callers open
/// a fresh reader to read again.
pub struct StatusReader<'a, M: RawMutex> {
    controller: &'a SharedController<M>,
    consumed: bool,
}

impl<'a, M: RawMutex> StatusReader<'a, M> {
    #[must_use]
    pub const fn open(controller: &'a SharedController<M>) -> Self {
        Self {
            controller,
            consumed: false,
        }
    }

    /// Copies the report into `buf`, returning the number of bytes written.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        if self.consumed {
            return 0;
        }
        self.consumed = true;

        let text = self.controller.snapshot().render();
        let len = text.len().min(buf.len());
        buf[..len].copy_from_slice(&text.as_bytes()[..len]);
        len
    }

    /// Returns `true` once the session has delivered its block.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}
