//! Mode controller and the traits front-ends implement around it.
//!
//! [`ModeController`] owns every piece of sequencing state: the active
//! [`Mode`], the normal-cycle sequencer and one blinker per flashing mode.
//! Firmware and emulator never touch those fields directly; they go through
//! [`SharedController`], which wraps the controller, the rate configuration
//! and the telemetry ring in a single lock.

use core::fmt;

use crate::sequences::{Color, FlashSequencer, LightOutputs, NormalPhase, NormalSequencer};

mod shared;

pub use shared::{SharedController, SignalState, TickReport};

/// Operating mode selected by the advance button.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Normal,
    FlashRed,
    FlashYellow,
}

impl Mode {
    /// Total number of distinct modes.
    pub const COUNT: usize = 3;

    /// Mode selected by the next advance event.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Mode::Normal => Mode::FlashRed,
            Mode::FlashRed => Mode::FlashYellow,
            Mode::FlashYellow => Mode::Normal,
        }
    }

    /// Name shown in the status report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::FlashRed => "flashing-red",
            Mode::FlashYellow => "flashing-yellow",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Abstraction over the physical lamp outputs.
pub trait SignalDriver {
    /// Drives the three lamps to match `outputs`.
    fn apply(&mut self, outputs: LightOutputs);

    /// Darkens every lamp.
    fn all_off(&mut self) {
        self.apply(LightOutputs::OFF);
    }
}

/// Lamp driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSignalDriver;

impl NoopSignalDriver {
    /// Creates a new no-op lamp driver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SignalDriver for NoopSignalDriver {
    fn apply(&mut self, _: LightOutputs) {}
}

/// Routes ticks to the sequencer that matches the active mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ModeController {
    mode: Mode,
    normal: NormalSequencer,
    flash_red: FlashSequencer,
    flash_yellow: FlashSequencer,
}

impl ModeController {
    /// Creates a controller in normal mode at the start of green.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Normal,
            normal: NormalSequencer::new(),
            flash_red: FlashSequencer::new(Color::Red),
            flash_yellow: FlashSequencer::new(Color::Yellow),
        }
    }

    pub fn tick(&mut self) -> LightOutputs {
        match self.mode {
            Mode::Normal => self.normal.tick(),
            Mode::FlashRed => self.flash_red.tick(),
            Mode::FlashYellow => self.flash_yellow.tick(),
        }
    }

    /// Cycles to the next mode and restarts the normal sequence at green.
    ///
    /// Returns the newly active mode.
    pub fn advance_mode(&mut self) -> Mode {
        self.mode = self.mode.next();
        self.normal.reset();
        self.mode
    }

    /// Latches a pedestrian request when in normal mode.
    ///
    /// Requests made while flashing are dropped, not queued. Returns `true`
    /// when the request was latched.
    pub fn request_pedestrian(&mut self) -> bool {
        if self.mode == Mode::Normal {
            self.normal.request_pedestrian();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Normal-cycle phase, or `None` while a flashing mode is active.
    #[must_use]
    pub const fn phase(&self) -> Option<NormalPhase> {
        match self.mode {
            Mode::Normal => Some(self.normal.phase()),
            Mode::FlashRed | Mode::FlashYellow => None,
        }
    }

    /// Read-only view of the normal-cycle sequencer.
    #[must_use]
    pub const fn normal(&self) -> &NormalSequencer {
        &self.normal
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
