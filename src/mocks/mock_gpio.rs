// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    Low,
    High,
}

thread_local! {
    static MOCK_PINS: RefCell<HashMap<u8, Level>> = RefCell::new(HashMap::new());
    static UNAVAILABLE_PINS: RefCell<HashSet<u8>> = RefCell::new(HashSet::new());
}

pub struct InputPin {
    pin: u8,
}

impl InputPin {
    pub fn read(&self) -> Level {
        get_mock_pin_level(self.pin)
    }
}

pub struct OutputPin {
    pin: u8,
}

impl OutputPin {
    pub fn set_high(&mut self) {
        set_mock_pin_level(self.pin, Level::High);
    }

    pub fn set_low(&mut self) {
        set_mock_pin_level(self.pin, Level::Low);
    }

    pub fn is_set_high(&self) -> bool {
        get_mock_pin_level(self.pin) == Level::High
    }
}

pub struct Gpio;

impl Gpio {
    pub fn new() -> io::Result<Self> {
        Ok(Gpio)
    }

    pub fn get(&self, pin: u8) -> io::Result<Pin> {
        if UNAVAILABLE_PINS.with(|pins| pins.borrow().contains(&pin)) {
            return Err(io::Error::new(io::ErrorKind::ResourceBusy, "pin busy"));
        }
        Ok(Pin { pin })
    }
}

pub struct Pin {
    pin: u8,
}

impl Pin {
    pub fn into_input_pullup(self) -> InputPin {
        MOCK_PINS.with(|pins| {
            pins.borrow_mut().insert(self.pin, Level::High);
        });
        InputPin { pin: self.pin }
    }

    pub fn into_output_low(self) -> OutputPin {
        set_mock_pin_level(self.pin, Level::Low);
        OutputPin { pin: self.pin }
    }
}

// test helper function to set pin levels
pub fn set_mock_pin_level(pin: u8, level: Level) {
    MOCK_PINS.with(|pins| {
        pins.borrow_mut().insert(pin, level);
    });
}

pub fn get_mock_pin_level(pin: u8) -> Level {
    MOCK_PINS.with(|pins| *pins.borrow().get(&pin).unwrap_or(&Level::High))
}

// test helper to make `Gpio::get` fail for a pin
pub fn set_mock_pin_unavailable(pin: u8) {
    UNAVAILABLE_PINS.with(|pins| {
        pins.borrow_mut().insert(pin);
    });
}

// test helper to reset all pins
pub fn reset_mock_pins() {
    MOCK_PINS.with(|pins| {
        pins.borrow_mut().clear();
    });
    UNAVAILABLE_PINS.with(|pins| {
        pins.borrow_mut().clear();
    });
}
