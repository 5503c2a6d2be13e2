//! Button tasks. Each trigger has its own task so a press on one line is
//! never missed while the other is debouncing.

use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;

use super::Controller;

const DEBOUNCE_MS: u64 = 50;

/// Forwards advance-button presses to the controller.
#[embassy_executor::task]
pub async fn advance(controller: &'static Controller, mut button: ExtiInput<'static>) -> ! {
    loop {
        wait_for_press(&mut button).await;
        let mode = controller.advance_mode();
        defmt::info!("button: advance -> {}", mode.label());
    }
}

/// Forwards pedestrian-button presses to the controller.
#[embassy_executor::task]
pub async fn pedestrian(controller: &'static Controller, mut button: ExtiInput<'static>) -> ! {
    loop {
        wait_for_press(&mut button).await;
        match controller.request_pedestrian() {
            Ok(()) => defmt::info!("button: pedestrian latched"),
            Err(mode) => defmt::info!("button: pedestrian dropped ({})", mode.label()),
        }
    }
}

/// Resolves on a falling edge that still reads low after the debounce delay.
async fn wait_for_press(button: &mut ExtiInput<'static>) {
    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_low() {
            return;
        }
    }
}
