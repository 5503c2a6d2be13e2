//! Lamp sequencing data structures shared by firmware and host targets.
//!
//! A sequencer turns one tick into one [`LightOutputs`] value. The normal
//! cycle lives in [`normal`], the single-lamp blinkers in [`flash`]. Nothing
//! here knows about pins, timers, or locks, so the same code runs on the
//! STM32 firmware and inside the host emulator.

use core::fmt;

pub mod flash;
pub mod normal;

pub use flash::FlashSequencer;
pub use normal::NormalSequencer;

/// Identifier for the three lamps on the signal head.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl Color {
    /// Lamps in status-report order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Yellow, Color::Green];

    /// Lower-case label used in status and log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lamp states emitted by a sequencer for a single tick.
///
/// Values are only built through the canonical constructors below, so every
/// combination that reaches a driver is one the sequencers can produce.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LightOutputs {
    red: bool,
    yellow: bool,
    green: bool,
}

impl LightOutputs {
    /// Every lamp dark. Used before the first tick and at shutdown.
    pub const OFF: Self = Self {
        red: false,
        yellow: false,
        green: false,
    };

    /// Outputs with a single lamp lit.
    #[must_use]
    pub const fn only(color: Color) -> Self {
        Self::single(color, true)
    }

    /// Outputs for a flashing lamp: `color` set to `on`, the rest forced off.
    #[must_use]
    pub const fn single(color: Color, on: bool) -> Self {
        Self {
            red: on && matches!(color, Color::Red),
            yellow: on && matches!(color, Color::Yellow),
            green: on && matches!(color, Color::Green),
        }
    }

    /// Red and yellow together, shown while the pedestrian hold runs.
    #[must_use]
    pub const fn pedestrian_hold() -> Self {
        Self {
            red: true,
            yellow: true,
            green: false,
        }
    }

    #[must_use]
    pub const fn red(self) -> bool {
        self.red
    }

    #[must_use]
    pub const fn yellow(self) -> bool {
        self.yellow
    }

    #[must_use]
    pub const fn green(self) -> bool {
        self.green
    }

    /// Returns the state of a single lamp.
    #[must_use]
    pub const fn is_lit(self, color: Color) -> bool {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
            Color::Green => self.green,
        }
    }

    /// Number of lamps currently lit.
    #[must_use]
    pub const fn lit_count(self) -> u8 {
        self.red as u8 + self.yellow as u8 + self.green as u8
    }
}

impl fmt::Display for LightOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, color) in Color::ALL.into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            let state = if self.is_lit(color) { "on" } else { "off" };
            write!(f, "{color} {state}")?;
        }
        Ok(())
    }
}

/// Sub-state of normal mode; each phase maps to one lamp combination.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NormalPhase {
    Green,
    Yellow,
    Red,
    PedestrianHold,
}

/// Ticks the green phase is held.
pub const GREEN_HOLD_TICKS: u8 = 3;
/// Ticks the yellow phase is held.
pub const YELLOW_HOLD_TICKS: u8 = 1;
/// Ticks the red phase is held.
pub const RED_HOLD_TICKS: u8 = 2;
/// Ticks the red+yellow pedestrian hold is held.
pub const PEDESTRIAN_HOLD_TICKS: u8 = 5;

/// Length of one normal cycle when nobody presses the pedestrian button.
pub const NORMAL_CYCLE_TICKS: u32 =
    GREEN_HOLD_TICKS as u32 + YELLOW_HOLD_TICKS as u32 + RED_HOLD_TICKS as u32;

impl NormalPhase {
    /// Number of ticks the phase stays active before transitioning.
    #[must_use]
    pub const fn hold_ticks(self) -> u8 {
        match self {
            NormalPhase::Green => GREEN_HOLD_TICKS,
            NormalPhase::Yellow => YELLOW_HOLD_TICKS,
            NormalPhase::Red => RED_HOLD_TICKS,
            NormalPhase::PedestrianHold => PEDESTRIAN_HOLD_TICKS,
        }
    }

    /// Canonical lamp combination for the phase.
    #[must_use]
    pub const fn outputs(self) -> LightOutputs {
        match self {
            NormalPhase::Green => LightOutputs::only(Color::Green),
            NormalPhase::Yellow => LightOutputs::only(Color::Yellow),
            NormalPhase::Red => LightOutputs::only(Color::Red),
            NormalPhase::PedestrianHold => LightOutputs::pedestrian_hold(),
        }
    }

    /// Phase that follows once the hold expires.
    ///
    /// Only the yellow exit looks at `pedestrian_pending`.
    #[must_use]
    pub const fn next(self, pedestrian_pending: bool) -> Self {
        match self {
            NormalPhase::Green => NormalPhase::Yellow,
            NormalPhase::Yellow if pedestrian_pending => NormalPhase::PedestrianHold,
            NormalPhase::Yellow => NormalPhase::Red,
            NormalPhase::Red | NormalPhase::PedestrianHold => NormalPhase::Green,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            NormalPhase::Green => "green",
            NormalPhase::Yellow => "yellow",
            NormalPhase::Red => "red",
            NormalPhase::PedestrianHold => "pedestrian-hold",
        }
    }
}

impl fmt::Display for NormalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_outputs_match_signal_head_wiring() {
        assert_eq!(NormalPhase::Green.outputs(), LightOutputs::only(Color::Green));
        assert_eq!(NormalPhase::Yellow.outputs(), LightOutputs::only(Color::Yellow));
        assert_eq!(NormalPhase::Red.outputs(), LightOutputs::only(Color::Red));

        let hold = NormalPhase::PedestrianHold.outputs();
        assert!(hold.red());
        assert!(hold.yellow());
        assert!(!hold.green());
    }

    #[test]
    fn hold_durations_sum_to_cycle_length() {
        assert_eq!(NORMAL_CYCLE_TICKS, 6);
        assert_eq!(NormalPhase::PedestrianHold.hold_ticks(), 5);
    }

    #[test]
    fn only_yellow_exit_consults_pedestrian_flag() {
        assert_eq!(NormalPhase::Green.next(true), NormalPhase::Yellow);
        assert_eq!(NormalPhase::Yellow.next(false), NormalPhase::Red);
        assert_eq!(NormalPhase::Yellow.next(true), NormalPhase::PedestrianHold);
        assert_eq!(NormalPhase::Red.next(true), NormalPhase::Green);
        assert_eq!(NormalPhase::PedestrianHold.next(true), NormalPhase::Green);
    }

    #[test]
    fn single_lamp_outputs_force_other_lamps_off() {
        let dark = LightOutputs::single(Color::Red, false);
        assert_eq!(dark, LightOutputs::OFF);
        assert_eq!(dark.lit_count(), 0);

        let lit = LightOutputs::single(Color::Yellow, true);
        assert!(lit.is_lit(Color::Yellow));
        assert_eq!(lit.lit_count(), 1);
    }
}
