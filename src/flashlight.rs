use anyhow::{Context, Result};
use log::info;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, InputPin, Level, OutputPin};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_gpio::{Gpio, InputPin, Level, OutputPin};

use crate::config::{GPIO_TORCH_LED, GPIO_TORCH_SWITCH};

/// Colour scheme the display should switch to along with the torch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    /// Dark dial on a white background.
    Light,
    /// White dial on a black background, used while the torch is lit.
    Dark,
}

impl Theme {
    pub fn for_torch(on: bool) -> Self {
        if on { Theme::Dark } else { Theme::Light }
    }
}

/// A torch LED driven by an on/off toggle switch.
pub struct Flashlight {
    switch: InputPin,
    torch: OutputPin,
    torch_on: bool,
}

impl Flashlight {
    pub fn new() -> Result<Self> {
        Self::with_pins(GPIO_TORCH_SWITCH, GPIO_TORCH_LED)
    }

    pub fn with_pins(switch_pin: u8, torch_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().context("Failed to open GPIO")?;

        let switch = gpio
            .get(switch_pin)
            .with_context(|| format!("Switch GPIO {switch_pin} is not available"))?
            .into_input_pullup();
        let torch = gpio
            .get(torch_pin)
            .with_context(|| format!("Torch GPIO {torch_pin} is not available"))?
            .into_output_low();

        Ok(Self {
            switch,
            torch,
            torch_on: false,
        })
    }

    /// Switch position; it pulls the pin low when flipped on.
    pub fn read_switch(&self) -> bool {
        self.switch.read() == Level::Low
    }

    pub fn is_on(&self) -> bool {
        self.torch_on
    }

    pub fn theme(&self) -> Theme {
        Theme::for_torch(self.torch_on)
    }

    pub fn set(&mut self, on: bool) -> Theme {
        if on {
            self.torch.set_high();
        } else {
            self.torch.set_low();
        }
        self.torch_on = on;
        info!("Torch {}", if on { "on" } else { "off" });
        self.theme()
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(!self.torch_on)
    }

    /// Follows the switch. Returns the new theme when the torch changed.
    pub fn update(&mut self) -> Option<Theme> {
        let switch_on = self.read_switch();
        if switch_on == self.torch_on {
            return None;
        }
        Some(self.set(switch_on))
    }
}
