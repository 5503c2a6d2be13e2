//! Log mirroring for the controller's telemetry ring.
//!
//! The ring lives inside the shared controller; the firmware only keeps a
//! cursor and forwards anything newer to defmt (or stdout on the host) after
//! each tick or button press. Records are copied out under the lock and
//! logged after it is released.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;
use signal_core::controller::{SharedController, TickReport};
use signal_core::telemetry::{EventId, TELEMETRY_RING_CAPACITY, TelemetryRecord, TickIndex};

/// Ticks between periodic status lines.
pub const STATUS_LOG_INTERVAL_TICKS: TickIndex = 30;

pub type PendingRecords = Vec<TelemetryRecord, TELEMETRY_RING_CAPACITY>;

/// Tracks which telemetry records have already been logged.
pub struct TelemetryCursor {
    next: EventId,
}

impl TelemetryCursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    #[must_use]
    pub const fn next_event_id(&self) -> EventId {
        self.next
    }

    /// Copies every record newer than the cursor out of the controller.
    ///
    /// Records that were overwritten in the ring before being collected are
    /// skipped silently.
    pub fn collect<M: RawMutex>(&mut self, controller: &SharedController<M>) -> PendingRecords {
        let from = self.next;
        let (pending, next) = controller.with_state(|state| {
            let telemetry = state.telemetry();
            let pending: PendingRecords = telemetry.since(from).copied().collect();
            (pending, telemetry.next_event_id())
        });
        self.next = next;
        pending
    }

    /// Logs every record newer than the cursor and returns how many were logged.
    pub fn drain<M: RawMutex>(&mut self, controller: &SharedController<M>) -> usize {
        let pending = self.collect(controller);
        for record in &pending {
            emit_log("telemetry", record);
        }
        pending.len()
    }
}

impl Default for TelemetryCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` when `tick` should produce a periodic status line.
#[must_use]
pub const fn status_due(tick: TickIndex) -> bool {
    tick % STATUS_LOG_INTERVAL_TICKS == 0
}

/// Emits the periodic status line for a tick when one is due.
pub fn log_tick(report: &TickReport) {
    if status_due(report.tick) {
        emit_log("status", &TickLine(report));
    }
}

struct TickLine<'a>(&'a TickReport);

impl fmt::Display for TickLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write!(
            f,
            "tick {} [{}] lights: {}",
            report.tick, report.mode, report.outputs
        )
    }
}

#[cfg(target_os = "none")]
pub fn emit_log<T: fmt::Display>(topic: &'static str, line: &T) {
    defmt::info!("{}: {}", topic, defmt::Display2Format(line));
}

#[cfg(not(target_os = "none"))]
pub fn emit_log<T: fmt::Display>(topic: &'static str, line: &T) {
    println!("{topic}: {line}");
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use signal_core::controller::Mode;
    use signal_core::telemetry::TelemetryEvent;

    use super::*;

    type Controller = SharedController<NoopRawMutex>;

    #[test]
    fn cursor_only_returns_new_records() {
        let controller = Controller::new();
        let mut cursor = TelemetryCursor::new();
        assert!(cursor.collect(&controller).is_empty());

        controller.advance_mode();
        let pending = cursor.collect(&controller);
        assert_eq!(pending.len(), 1);
        assert_eq!(
            pending[0].event,
            TelemetryEvent::ModeChanged {
                from: Mode::Normal,
                to: Mode::FlashRed,
            }
        );
        assert_eq!(cursor.next_event_id(), 1);

        assert!(cursor.collect(&controller).is_empty());

        assert_eq!(controller.request_pedestrian(), Err(Mode::FlashRed));
        assert_eq!(cursor.drain(&controller), 1);
        assert_eq!(cursor.next_event_id(), 2);
    }

    #[test]
    fn cursor_skips_records_lost_to_overflow() {
        let controller = Controller::new();
        let mut cursor = TelemetryCursor::new();

        let total = TELEMETRY_RING_CAPACITY + 6;
        for _ in 0..total {
            controller.advance_mode();
        }

        let pending = cursor.collect(&controller);
        assert_eq!(pending.len(), TELEMETRY_RING_CAPACITY);
        assert_eq!(pending[0].id, 6);
        assert_eq!(cursor.next_event_id() as usize, total);
    }

    #[test]
    fn status_line_is_periodic() {
        assert!(!status_due(1));
        assert!(!status_due(STATUS_LOG_INTERVAL_TICKS - 1));
        assert!(status_due(STATUS_LOG_INTERVAL_TICKS));
        assert!(status_due(STATUS_LOG_INTERVAL_TICKS * 4));
    }
}
