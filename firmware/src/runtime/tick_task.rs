use embassy_time::Timer;
use signal_core::controller::SignalDriver;

use super::Controller;
use crate::hw::HardwareSignalDriver;
use crate::telemetry::{self, TelemetryCursor};

/// Sole owner of the tick path: sleeps one period, ticks, drives the lamps.
///
/// The period is re-read every loop so rate writes take effect on the next
/// tick without restarting the task.
#[embassy_executor::task]
pub async fn run(controller: &'static Controller, mut driver: HardwareSignalDriver<'static>) -> ! {
    driver.all_off();
    let mut cursor = TelemetryCursor::new();

    loop {
        Timer::after_millis(u64::from(controller.period_ms())).await;

        let report = controller.tick();
        driver.apply(report.outputs);

        cursor.drain(controller);
        telemetry::log_tick(&report);
    }
}
