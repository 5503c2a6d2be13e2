//! Lock-guarded controller cell shared by the tick source and trigger inputs.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{Mode, ModeController};
use crate::rate::{RateConfig, RateError, decode_rate_write};
use crate::sequences::{LightOutputs, NormalPhase};
use crate::status::StatusSnapshot;
use crate::telemetry::{TelemetryEvent, TelemetryRecorder, TickIndex};

/// Everything the signal mutates, kept in one place so a single critical
/// section always observes a consistent view.
pub struct SignalState {
    controller: ModeController,
    rate: RateConfig,
    last_outputs: LightOutputs,
    ticks: TickIndex,
    telemetry: TelemetryRecorder,
}

impl SignalState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            controller: ModeController::new(),
            rate: RateConfig::new(),
            last_outputs: LightOutputs::OFF,
            ticks: 0,
            telemetry: TelemetryRecorder::new(),
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &ModeController {
        &self.controller
    }

    #[must_use]
    pub const fn rate(&self) -> &RateConfig {
        &self.rate
    }

    /// Outputs produced by the most recent tick; all off before the first.
    #[must_use]
    pub const fn last_outputs(&self) -> LightOutputs {
        self.last_outputs
    }

    /// Number of ticks processed since start-up.
    #[must_use]
    pub const fn ticks(&self) -> TickIndex {
        self.ticks
    }

    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    fn tick(&mut self) -> TickReport {
        let before = self.controller.phase();
        let outputs = self.controller.tick();
        self.ticks = self.ticks.wrapping_add(1);
        self.last_outputs = outputs;

        let after = self.controller.phase();
        if let Some(phase) = after.filter(|_| after != before) {
            self.telemetry
                .record(TelemetryEvent::PhaseEntered(phase), self.ticks);
        }

        TickReport {
            tick: self.ticks,
            mode: self.controller.mode(),
            outputs,
            next_phase: after,
        }
    }

    fn advance_mode(&mut self) -> Mode {
        let from = self.controller.mode();
        let to = self.controller.advance_mode();
        self.telemetry
            .record(TelemetryEvent::ModeChanged { from, to }, self.ticks);
        to
    }

    fn request_pedestrian(&mut self) -> Result<(), Mode> {
        let result = if self.controller.request_pedestrian() {
            Ok(())
        } else {
            Err(self.controller.mode())
        };
        let event = match result {
            Ok(()) => TelemetryEvent::PedestrianRequested,
            Err(mode) => TelemetryEvent::PedestrianDropped(mode),
        };
        self.telemetry.record(event, self.ticks);
        result
    }

    fn apply_rate(&mut self, result: Result<i32, RateError>) -> Result<RateConfig, RateError> {
        let outcome = result.and_then(|hz| self.rate.set(hz));
        let event = match outcome {
            Ok(()) => TelemetryEvent::RateChanged {
                hz: self.rate.current_hz(),
                period_ms: self.rate.period_ms(),
            },
            Err(err) => TelemetryEvent::RateRejected(err),
        };
        self.telemetry.record(event, self.ticks);
        outcome.map(|()| self.rate)
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::new(
            self.controller.mode(),
            self.rate.current_hz(),
            self.last_outputs,
        )
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a single tick, handed back to the tick source.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TickReport {
    /// One-based index of the tick just processed.
    pub tick: TickIndex,
    /// Mode the tick ran in.
    pub mode: Mode,
    /// Lamps to drive until the next tick.
    pub outputs: LightOutputs,
    /// Normal phase that will be emitted on the next tick, if in normal mode.
    pub next_phase: Option<NormalPhase>,
}

/// Interrupt-safe wrapper around [`SignalState`].
///
/// `M` selects the locking strategy: `CriticalSectionRawMutex` when the tick
/// source and the triggers run in different execution contexts,
/// `NoopRawMutex` for single-threaded use.
pub struct SharedController<M: RawMutex> {
    state: Mutex<M, RefCell<SignalState>>,
}

impl<M: RawMutex> SharedController<M> {
    /// Creates the start-up state: normal mode, green phase, 1 Hz.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(SignalState::new())),
        }
    }

    /// Advances the active sequencer by one tick.
    pub fn tick(&self) -> TickReport {
        self.with_state_mut(SignalState::tick)
    }

    /// Cycles to the next mode. Returns the newly active mode.
    pub fn advance_mode(&self) -> Mode {
        self.with_state_mut(SignalState::advance_mode)
    }

    /// Latches a pedestrian request.
    ///
    /// # Errors
    ///
    /// Returns the active mode when it is not `Normal`; the request is
    /// dropped, not queued.
    pub fn request_pedestrian(&self) -> Result<(), Mode> {
        self.with_state_mut(SignalState::request_pedestrian)
    }

    /// Applies a numeric rate, returning the resulting configuration.
    pub fn set_rate(&self, hz: i32) -> Result<RateConfig, RateError> {
        self.with_state_mut(|state| state.apply_rate(Ok(hz)))
    }

    /// Applies a raw rate-write payload such as `b"4\n"`.
    ///
    /// Parsing happens outside the lock; only the store is guarded.
    pub fn write_rate(&self, payload: &[u8]) -> Result<RateConfig, RateError> {
        let decoded = decode_rate_write(payload);
        self.with_state_mut(|state| state.apply_rate(decoded))
    }

    /// Current tick period; the tick source re-reads it before every wait.
    #[must_use]
    pub fn period_ms(&self) -> u32 {
        self.with_state(|state| state.rate.period_ms())
    }

    /// Consistent (mode, rate, lamps) view for status rendering.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.with_state(SignalState::snapshot)
    }

    /// Runs `f` with shared access to the state inside one critical section.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SignalState) -> R,
    {
        self.state.lock(|cell| f(&cell.borrow()))
    }

    fn with_state_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SignalState) -> R,
    {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<M: RawMutex> Default for SharedController<M> {
    fn default() -> Self {
        Self::new()
    }
}
