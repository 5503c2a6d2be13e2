//! Normal green → yellow → red cycle with the pedestrian-hold extension.
//!
//! Each call to [`NormalSequencer::tick`] emits the lamps for the phase that
//! is active when the tick starts, then counts the tick against that phase's
//! hold. A phase change therefore becomes visible on the following tick.

use super::{LightOutputs, NormalPhase};

/// Finite-state machine driving the lamps while the controller is in normal mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NormalSequencer {
    phase: NormalPhase,
    counter: u8,
    pedestrian_pending: bool,
}

impl NormalSequencer {
    /// Creates a sequencer at the start of the green phase with no pending request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: NormalPhase::Green,
            counter: 0,
            pedestrian_pending: false,
        }
    }

    /// Emits the current phase's lamps and advances the phase counter.
    pub fn tick(&mut self) -> LightOutputs {
        let outputs = self.phase.outputs();

        self.counter = self.counter.saturating_add(1);
        if self.counter >= self.phase.hold_ticks() {
            let next = self.phase.next(self.pedestrian_pending);
            if next == NormalPhase::PedestrianHold {
                self.pedestrian_pending = false;
            }
            self.phase = next;
            self.counter = 0;
        }

        outputs
    }

    /// Latches a pedestrian request for the next yellow exit.
    pub fn request_pedestrian(&mut self) {
        self.pedestrian_pending = true;
    }

    /// Returns to the start of green. A latched pedestrian request is kept.
    pub fn reset(&mut self) {
        self.phase = NormalPhase::Green;
        self.counter = 0;
    }

    #[must_use]
    pub const fn phase(&self) -> NormalPhase {
        self.phase
    }

    /// Ticks already spent in the current phase.
    #[must_use]
    pub const fn counter(&self) -> u8 {
        self.counter
    }

    #[must_use]
    pub const fn pedestrian_pending(&self) -> bool {
        self.pedestrian_pending
    }
}

impl Default for NormalSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequences::{Color, NORMAL_CYCLE_TICKS};

    fn run(sequencer: &mut NormalSequencer, ticks: u32) -> LightOutputs {
        let mut last = LightOutputs::OFF;
        for _ in 0..ticks {
            last = sequencer.tick();
        }
        last
    }

    #[test]
    fn green_holds_for_three_ticks() {
        let mut sequencer = NormalSequencer::new();

        for _ in 0..2 {
            assert_eq!(sequencer.tick(), LightOutputs::only(Color::Green));
            assert_eq!(sequencer.phase(), NormalPhase::Green);
        }

        assert_eq!(sequencer.tick(), LightOutputs::only(Color::Green));
        assert_eq!(sequencer.phase(), NormalPhase::Yellow);
        assert_eq!(sequencer.counter(), 0);
    }

    #[test]
    fn yellow_without_request_moves_to_red() {
        let mut sequencer = NormalSequencer::new();
        run(&mut sequencer, 3);

        assert_eq!(sequencer.tick(), LightOutputs::only(Color::Yellow));
        assert_eq!(sequencer.phase(), NormalPhase::Red);
    }

    #[test]
    fn full_cycle_returns_to_green() {
        let mut sequencer = NormalSequencer::new();
        run(&mut sequencer, NORMAL_CYCLE_TICKS);

        assert_eq!(sequencer, NormalSequencer::new());
    }

    #[test]
    fn pending_request_diverts_yellow_into_hold() {
        let mut sequencer = NormalSequencer::new();
        sequencer.request_pedestrian();
        run(&mut sequencer, 4);

        assert_eq!(sequencer.phase(), NormalPhase::PedestrianHold);
        assert!(!sequencer.pedestrian_pending());

        for _ in 0..5 {
            assert_eq!(sequencer.tick(), LightOutputs::pedestrian_hold());
        }
        assert_eq!(sequencer.phase(), NormalPhase::Green);
    }

    #[test]
    fn request_is_idempotent_and_does_not_interrupt_phase() {
        let mut sequencer = NormalSequencer::new();
        sequencer.tick();
        sequencer.request_pedestrian();
        sequencer.request_pedestrian();

        assert_eq!(sequencer.phase(), NormalPhase::Green);
        assert_eq!(sequencer.counter(), 1);
        assert!(sequencer.pedestrian_pending());
    }

    #[test]
    fn reset_keeps_latched_request() {
        let mut sequencer = NormalSequencer::new();
        run(&mut sequencer, 4);
        sequencer.request_pedestrian();
        sequencer.reset();

        assert_eq!(sequencer.phase(), NormalPhase::Green);
        assert_eq!(sequencer.counter(), 0);
        assert!(sequencer.pedestrian_pending());
    }
}
