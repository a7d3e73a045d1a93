// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

#[derive(Default)]
struct MockBus {
    registers: HashMap<u8, u8>,
    slave_address: Option<u16>,
}

thread_local! {
    static MOCK_BUS: RefCell<MockBus> = RefCell::new(MockBus::default());
}

pub struct I2c;

impl I2c {
    pub fn new() -> io::Result<Self> {
        Ok(I2c)
    }

    pub fn set_slave_address(&mut self, address: u16) -> io::Result<()> {
        MOCK_BUS.with(|bus| bus.borrow_mut().slave_address = Some(address));
        Ok(())
    }

    pub fn smbus_read_byte(&self, register: u8) -> io::Result<u8> {
        Ok(register_value(register))
    }

    pub fn smbus_write_byte(&self, register: u8, value: u8) -> io::Result<()> {
        set_register(register, value);
        Ok(())
    }
}

fn register_value(register: u8) -> u8 {
    MOCK_BUS.with(|bus| *bus.borrow().registers.get(&register).unwrap_or(&0))
}

// test helper to preload a register
pub fn set_register(register: u8, value: u8) {
    MOCK_BUS.with(|bus| {
        bus.borrow_mut().registers.insert(register, value);
    });
}

pub fn register(register: u8) -> u8 {
    register_value(register)
}

pub fn slave_address() -> Option<u16> {
    MOCK_BUS.with(|bus| bus.borrow().slave_address)
}

// test helper to reset the bus
pub fn reset() {
    MOCK_BUS.with(|bus| *bus.borrow_mut() = MockBus::default());
}
