//! Board wiring for the three signal lamps.
//!
//! Lamps are driven push-pull, active high: red on PA4, yellow on PA3 and
//! green on PA2. The buttons (advance on PB0, pedestrian on PB1) are wired to
//! ground and configured in [`crate::runtime`].

use embassy_stm32::gpio::{Level, Output};
use signal_core::controller::SignalDriver;
use signal_core::sequences::LightOutputs;

pub struct HardwareSignalDriver<'d> {
    red: Output<'d>,
    yellow: Output<'d>,
    green: Output<'d>,
}

impl<'d> HardwareSignalDriver<'d> {
    pub fn new(red: Output<'d>, yellow: Output<'d>, green: Output<'d>) -> Self {
        Self { red, yellow, green }
    }
}

impl SignalDriver for HardwareSignalDriver<'_> {
    fn apply(&mut self, outputs: LightOutputs) {
        self.red.set_level(level(outputs.red()));
        self.yellow.set_level(level(outputs.yellow()));
        self.green.set_level(level(outputs.green()));
    }
}

const fn level(lit: bool) -> Level {
    if lit { Level::High } else { Level::Low }
}
