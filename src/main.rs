use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};

use compass_rs::compass_sensor::CompassSensor;
use compass_rs::config::{
    COMPASS_POLL_INTERVAL_MS, DEFAULT_GPS_DEVICE, DEFAULT_STORE_PATH, LOOP_INTERVAL_MS,
    STATUS_UPDATE_INTERVAL_SECS,
};
use compass_rs::flashlight::Flashlight;
use compass_rs::nmea_source::NmeaSource;
use compass_rs::target_store::{JsonFileStore, TargetLocation};
use compass_rs::{
    CompassTracker, DeviceOrientation, Position, ScreenOrientation, SensorEvent, Update,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrientationValue {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl From<OrientationValue> for ScreenOrientation {
    fn from(value: OrientationValue) -> Self {
        match value {
            OrientationValue::Portrait => ScreenOrientation::Portrait,
            OrientationValue::PortraitUpsideDown => ScreenOrientation::PortraitUpsideDown,
            OrientationValue::LandscapeLeft => ScreenOrientation::LandscapeLeft,
            OrientationValue::LandscapeRight => ScreenOrientation::LandscapeRight,
        }
    }
}

#[derive(Parser)]
#[command(about = "Points a compass at a saved location")]
struct Cli {
    /// Serial device (or recorded NMEA log) to read GPS sentences from
    #[arg(long, default_value = DEFAULT_GPS_DEVICE)]
    gps: PathBuf,

    /// File the target location is persisted in
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Save a new target location before starting
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    set_target: Option<Vec<f64>>,

    /// Run without the magnetometer and use the GPS course as heading
    #[arg(long)]
    no_compass: bool,

    /// Run without the torch switch
    #[arg(long)]
    no_torch: bool,

    /// How the display is mounted
    #[arg(long, value_enum, default_value_t = OrientationValue::Portrait)]
    orientation: OrientationValue,

    /// The display is lying face down
    #[arg(long)]
    face_down: bool,

    /// Print every update as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

fn spawn_gps(path: PathBuf, course_headings: bool, tx: Sender<SensorEvent>) -> Result<()> {
    let source = NmeaSource::open(&path)?.with_course_headings(course_headings);
    thread::spawn(move || {
        for event in source {
            if tx.send(event).is_err() {
                break;
            }
        }
        warn!("GPS stream from {} ended", path.display());
    });
    Ok(())
}

fn spawn_compass(mut sensor: CompassSensor, tx: Sender<SensorEvent>) {
    thread::spawn(move || {
        loop {
            match sensor.read_heading() {
                Ok(heading) => {
                    if tx.send(SensorEvent::Heading(heading)).is_err() {
                        break;
                    }
                }
                Err(e) => debug!("Compass read skipped: {e:#}"),
            }
            thread::sleep(Duration::from_millis(COMPASS_POLL_INTERVAL_MS));
        }
    });
}

fn report(update: &Update, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(update).context("Failed to encode update")?
        );
        return Ok(());
    }

    match update {
        Update::Coordinates(readout) => {
            info!("Location: {}  {}", readout.latitude, readout.longitude)
        }
        Update::Heading(reading) => info!(
            "Heading {}º {}  rotation {:.3} rad",
            reading.heading_degrees, reading.direction, reading.rotation
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    colog::init();
    let cli = Cli::parse();

    let mut target_location = TargetLocation::new(JsonFileStore::new(&cli.store));
    if let Some(coords) = &cli.set_target {
        target_location.set(Position::new(coords[0], coords[1]))?;
    }
    let target = target_location.load_or_default();
    info!("Pointing at {target}");

    let orientation = DeviceOrientation::new(cli.orientation.into(), cli.face_down);
    let mut tracker = CompassTracker::with_orientation(target, orientation);

    let (tx, rx) = mpsc::channel();

    let compass = if cli.no_compass {
        None
    } else {
        match CompassSensor::new() {
            Ok(sensor) => Some(sensor),
            Err(e) => {
                warn!("Compass unavailable, using GPS course instead: {e:#}");
                None
            }
        }
    };
    let course_headings = compass.is_none();
    if let Some(sensor) = compass {
        spawn_compass(sensor, tx.clone());
    }
    spawn_gps(cli.gps.clone(), course_headings, tx.clone())?;

    let mut flashlight = if cli.no_torch {
        None
    } else {
        match Flashlight::new() {
            Ok(flashlight) => Some(flashlight),
            Err(e) => {
                warn!("Torch is not available: {e:#}");
                None
            }
        }
    };

    // only the sensor threads keep the channel open from here on
    drop(tx);
    let mut last_status_update = Instant::now();

    info!("Main loop started.");
    loop {
        match rx.recv_timeout(Duration::from_millis(LOOP_INTERVAL_MS)) {
            Ok(event) => {
                if let Some(update) = tracker.handle(event) {
                    report(&update, cli.json)?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                error!("All sensors stopped");
                break;
            }
        }

        if let Some(theme) = flashlight.as_mut().and_then(Flashlight::update) {
            info!("Display theme: {theme:?}");
        }

        if last_status_update.elapsed() >= Duration::from_secs(STATUS_UPDATE_INTERVAL_SECS) {
            match tracker.get_current_position() {
                Some(pos) => info!(
                    "[Status] Position: {}  target {:.0} m away at {:.1}°",
                    pos,
                    pos.distance_to(&tracker.target()),
                    pos.bearing_to_degrees(&tracker.target())
                ),
                None => info!("[Status] Waiting for GPS fix..."),
            }
            last_status_update = Instant::now();
        }
    }

    Ok(())
}
