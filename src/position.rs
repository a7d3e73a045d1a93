use std::f64::consts::PI;
use std::fmt;

use anyhow::{Result, ensure};
use serde::Serialize;

use crate::angle::{degrees_to_radians, radians_to_degrees};
use crate::config::COORDINATE_LABEL_CHARS;

/// Earth's radius in meters.
const EARTH_RADIUS: f64 = 6371000.0;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.latitude, self.longitude)
    }
}

impl Position {
    /// Where the compass points when no target has been saved yet.
    pub const NORTH_POLE: Position = Position {
        latitude: 90.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Like [`Position::new`], but rejects coordinates off the globe.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        ensure!(
            latitude.is_finite() && (-90.0..=90.0).contains(&latitude),
            "Latitude {latitude} is outside [-90, 90]"
        );
        ensure!(
            longitude.is_finite() && (-180.0..=180.0).contains(&longitude),
            "Longitude {longitude} is outside [-180, 180]"
        );
        Ok(Self::new(latitude, longitude))
    }

    /// Initial bearing from this position to `target`, in radians.
    ///
    /// 0 is true north and positive values turn clockwise (east). The result
    /// lies in (-π, π]; coincident points and poles fall out of `atan2` as 0.
    pub fn bearing_to(&self, target: &Position) -> f64 {
        let lat1 = degrees_to_radians(self.latitude);
        let lon1 = degrees_to_radians(self.longitude);
        let lat2 = degrees_to_radians(target.latitude);
        let lon2 = degrees_to_radians(target.longitude);

        let delta_lon = lon2 - lon1;

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

        let bearing = y.atan2(x);
        // atan2(-0.0, x < 0) is -π, due south belongs to +π
        if bearing == -PI { PI } else { bearing }
    }

    /// Same as [`Position::bearing_to`], in signed degrees.
    pub fn bearing_to_degrees(&self, target: &Position) -> f64 {
        radians_to_degrees(self.bearing_to(target))
    }

    /// Calculate distance to another position using Haversine formula.
    /// Read more here: https://en.wikipedia.org/wiki/Haversine_formula
    /// Returns the distance in meters.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let lat_from = self.latitude.to_radians();
        let lat_to = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Latitude readout, e.g. `48.05744º N`.
    pub fn latitude_label(&self) -> String {
        format!("{}º N", truncated(self.latitude))
    }

    /// Longitude readout, e.g. `-123.1196º E`.
    pub fn longitude_label(&self) -> String {
        format!("{}º E", truncated(self.longitude))
    }
}

fn truncated(value: f64) -> String {
    format!("{value:?}")
        .chars()
        .take(COORDINATE_LABEL_CHARS)
        .collect()
}
