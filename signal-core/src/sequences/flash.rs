//! Single-lamp blinker used by the flashing modes.

use super::{Color, LightOutputs};

/// Toggles one lamp on every tick while the other two stay dark.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FlashSequencer {
    color: Color,
    on: bool,
}

impl FlashSequencer {
    /// Creates a blinker for `color`, starting dark so the first tick lights it.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self { color, on: false }
    }

    pub fn tick(&mut self) -> LightOutputs {
        self.on = !self.on;
        LightOutputs::single(self.color, self.on)
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}
