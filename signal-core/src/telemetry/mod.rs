//! Telemetry event catalog and the fixed-size history ring.
//!
//! Every state change that a front-end may want to log is recorded here,
//! stamped with the index of the tick during which it happened. Firmware
//! forwards the `Display` form to `defmt`, the emulator prints it to the
//! console and transcript, so both paths use identical labels.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::controller::Mode;
use crate::rate::RateError;
use crate::sequences::NormalPhase;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Monotonic identifier assigned to every record.
pub type EventId = u32;

/// Number of ticks processed since start-up.
pub type TickIndex = u64;

/// Discriminated telemetry events shared across all targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEvent {
    ModeChanged { from: Mode, to: Mode },
    PhaseEntered(NormalPhase),
    PedestrianRequested,
    /// Request arrived while a flashing mode was active and was discarded.
    PedestrianDropped(Mode),
    RateChanged { hz: u8, period_ms: u32 },
    RateRejected(RateError),
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEvent::ModeChanged { from, to } => write!(f, "mode-changed {from} -> {to}"),
            TelemetryEvent::PhaseEntered(phase) => write!(f, "phase-entered {phase}"),
            TelemetryEvent::PedestrianRequested => f.write_str("pedestrian-requested"),
            TelemetryEvent::PedestrianDropped(mode) => write!(f, "pedestrian-dropped ({mode})"),
            TelemetryEvent::RateChanged { hz, period_ms } => {
                write!(f, "rate-changed {hz} Hz ({period_ms} ms)")
            }
            TelemetryEvent::RateRejected(err) => write!(f, "rate-rejected: {err}"),
        }
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub tick: TickIndex,
    pub event: TelemetryEvent,
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} @tick {}: {}", self.id, self.tick, self.event)
    }
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord, CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer.
///
/// Once the ring is full the oldest record is overwritten; identifiers keep
/// counting so readers can tell how many records they missed.
pub struct TelemetryRecorder<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> {
    ring: TelemetryRing<CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> TelemetryRecorder<CAPACITY> {
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Records an event and returns its identifier.
    pub fn record(&mut self, event: TelemetryEvent, tick: TickIndex) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord { id, tick, event });

        id
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    #[must_use]
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    /// Iterates over records with an identifier at or after `from`.
    ///
    /// Front-ends keep the last identifier they printed and drain new
    /// records with this after every operation.
    pub fn since(&self, from: EventId) -> impl Iterator<Item = &TelemetryRecord> + '_ {
        self.ring
            .oldest_ordered()
            .filter(move |record| record.id.wrapping_sub(from) < EventId::MAX / 2)
    }

    /// Identifier the next recorded event will receive.
    #[must_use]
    pub const fn next_event_id(&self) -> EventId {
        self.next_event_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<const CAPACITY: usize> Default for TelemetryRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
