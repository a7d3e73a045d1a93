use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use log::info;

// Use rppal in production
#[cfg(not(test))]
use rppal::i2c::I2c;

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_i2c::I2c;

use crate::angle::normalize_degrees;
use crate::config::{HEADING_OFFSET, MAGNETOMETER_I2C_ADDR, X_OFFSET, Y_OFFSET};

// LIS3MDL Register addresses
const WHO_AM_I: u8 = 0x0F;
const CTRL_REG1: u8 = 0x20;
const CTRL_REG2: u8 = 0x21;
const CTRL_REG3: u8 = 0x22;
const CTRL_REG4: u8 = 0x23;
const CTRL_REG5: u8 = 0x24;
const STATUS_REG: u8 = 0x27;
const OUT_X_L: u8 = 0x28;

const LIS3MDL_ID: u8 = 0x3D;
/// STATUS_REG bit: new X, Y and Z data available.
const ZYXDA: u8 = 0x08;

/// Hard iron correction plus the mounting offset of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub x_offset: f64,
    pub y_offset: f64,
    pub heading_offset: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            x_offset: X_OFFSET,
            y_offset: Y_OFFSET,
            heading_offset: HEADING_OFFSET,
        }
    }
}

/// Magnetic heading in [0, 360) from raw magnetometer X/Y counts.
pub fn heading_from_raw(x_raw: f64, y_raw: f64, calibration: &Calibration) -> f64 {
    // Apply hard iron calibration (center the readings)
    let x = x_raw - calibration.x_offset;
    let y = y_raw - calibration.y_offset;

    let raw_heading = y.atan2(x).to_degrees();
    normalize_degrees(raw_heading + calibration.heading_offset)
}

/// Tracks the min/max extent of samples while the board is rotated.
/// The centre of that box is the hard iron offset.
#[derive(Clone, Copy, Debug)]
pub struct CalibrationTracker {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    samples: usize,
}

impl Default for CalibrationTracker {
    fn default() -> Self {
        Self {
            x_min: f64::MAX,
            x_max: f64::MIN,
            y_min: f64::MAX,
            y_max: f64::MIN,
            samples: 0,
        }
    }
}

impl CalibrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// (x, y) offsets, `None` before the first sample.
    pub fn offsets(&self) -> Option<(f64, f64)> {
        if self.samples == 0 {
            return None;
        }
        Some((
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ))
    }
}

/// LIS3MDL magnetometer on the default I2C bus.
pub struct CompassSensor {
    i2c: I2c,
    calibration: Calibration,
}

impl CompassSensor {
    pub fn new() -> Result<Self> {
        Self::with_calibration(Calibration::default())
    }

    pub fn with_calibration(calibration: Calibration) -> Result<Self> {
        let mut i2c = I2c::new().context("Failed to open I2C bus")?;
        i2c.set_slave_address(MAGNETOMETER_I2C_ADDR)
            .context("Failed to address magnetometer")?;

        let who_am_i = i2c.smbus_read_byte(WHO_AM_I)?;
        if who_am_i != LIS3MDL_ID {
            bail!(
                "Wrong device ID: 0x{:02X}, expected 0x{:02X}",
                who_am_i,
                LIS3MDL_ID
            );
        }

        // CTRL_REG1: Temperature enabled, Ultra-high performance mode (X,Y), ODR = 80 Hz
        i2c.smbus_write_byte(CTRL_REG1, 0xFC)?;
        // CTRL_REG2: Full scale ±4 gauss
        i2c.smbus_write_byte(CTRL_REG2, 0x00)?;
        // CTRL_REG3: Continuous conversion mode
        i2c.smbus_write_byte(CTRL_REG3, 0x00)?;
        // CTRL_REG4: Ultra-high performance mode (Z-axis), little endian
        i2c.smbus_write_byte(CTRL_REG4, 0x0C)?;
        // CTRL_REG5: Block data update enabled
        i2c.smbus_write_byte(CTRL_REG5, 0x40)?;

        thread::sleep(Duration::from_millis(100));

        let status = i2c.smbus_read_byte(STATUS_REG)?;
        ensure!(
            status != 0,
            "Magnetometer hardware not responding (no data ready)"
        );

        info!("Compass (LIS3MDL) initialized");
        Ok(Self { i2c, calibration })
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Calibrated magnetic heading in degrees.
    pub fn read_heading(&mut self) -> Result<f64> {
        let (x, y) = self.read_raw_magnetometer()?;
        Ok(heading_from_raw(x, y, &self.calibration))
    }

    /// Read raw magnetometer X, Y values (for calibration)
    pub fn read_raw_magnetometer(&mut self) -> Result<(f64, f64)> {
        let status = self.i2c.smbus_read_byte(STATUS_REG)?;
        ensure!(status & ZYXDA != 0, "Magnetometer data not ready");

        let mut data = [0u8; 4];
        for (i, item) in data.iter_mut().enumerate() {
            *item = self.i2c.smbus_read_byte(OUT_X_L + i as u8)?;
        }

        // Convert to signed 16-bit values (little endian)
        let x = i16::from_le_bytes([data[0], data[1]]) as f64;
        let y = i16::from_le_bytes([data[2], data[3]]) as f64;

        Ok((x, y))
    }
}
