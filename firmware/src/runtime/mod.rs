use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use signal_core::controller::SharedController;

use crate::hw::HardwareSignalDriver;

mod input_task;
mod tick_task;

pub(super) type Controller = SharedController<CriticalSectionRawMutex>;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static CONTROLLER: Controller = SharedController::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA2,
        PA3,
        PA4,
        PB0,
        PB1,
        EXTI0,
        EXTI1,
        ..
    } = hal::init(config);

    let driver = HardwareSignalDriver::new(
        Output::new(PA4, Level::Low, Speed::Low),
        Output::new(PA3, Level::Low, Speed::Low),
        Output::new(PA2, Level::Low, Speed::Low),
    );

    let advance = ExtiInput::new(PB0, EXTI0, Pull::Up);
    let pedestrian = ExtiInput::new(PB1, EXTI1, Pull::Up);

    defmt::info!(
        "traffic-signal up: {} at {} ms/tick",
        CONTROLLER.snapshot().mode.label(),
        CONTROLLER.period_ms()
    );

    spawner
        .spawn(tick_task::run(&CONTROLLER, driver))
        .expect("failed to spawn tick task");

    spawner
        .spawn(input_task::advance(&CONTROLLER, advance))
        .expect("failed to spawn advance button task");

    spawner
        .spawn(input_task::pedestrian(&CONTROLLER, pedestrian))
        .expect("failed to spawn pedestrian button task");

    core::future::pending::<()>().await;
}
