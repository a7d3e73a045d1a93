pub mod angle;
pub mod compass;
pub mod compass_sensor;
pub mod config;
pub mod flashlight;
pub mod nmea_source;
pub mod position;
pub mod rotation;
pub mod target_store;
pub mod tracker;

// Re-export commonly used types
pub use compass::Direction;
pub use position::Position;
pub use rotation::{DeviceOrientation, ScreenOrientation};
pub use tracker::{CompassReading, CompassTracker, SensorEvent, Update};

#[cfg(test)]
pub(crate) mod mocks;
