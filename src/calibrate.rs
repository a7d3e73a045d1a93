use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use compass_rs::compass_sensor::{CalibrationTracker, CompassSensor};

fn main() -> Result<()> {
    colog::init();

    info!("Magnetometer calibration");
    info!("1. Keep the board LEVEL (horizontal)");
    info!("2. Slowly rotate the board through a FULL 360° circle");
    info!("3. Take at least 30 seconds to complete the rotation");
    info!("4. Press Ctrl+C when done, then copy the offsets into config.rs");

    info!("Starting in 5 seconds...");
    thread::sleep(Duration::from_secs(5));

    let mut compass = CompassSensor::new()?;
    let mut tracker = CalibrationTracker::new();

    info!("Collecting samples... (ROTATE NOW!)");
    loop {
        if let Ok((x, y)) = compass.read_raw_magnetometer() {
            tracker.add_sample(x, y);

            if tracker.samples() % 10 == 0
                && let Some((x_offset, y_offset)) = tracker.offsets()
            {
                let (x_min, x_max) = tracker.x_range();
                let (y_min, y_max) = tracker.y_range();
                info!(
                    "{:>6} samples | X {:>7.0} to {:>7.0} | Y {:>7.0} to {:>7.0} | X_OFFSET {:>7.0} Y_OFFSET {:>7.0}",
                    tracker.samples(),
                    x_min,
                    x_max,
                    y_min,
                    y_max,
                    x_offset,
                    y_offset
                );
            }
        }

        thread::sleep(Duration::from_millis(100));
    }
}
