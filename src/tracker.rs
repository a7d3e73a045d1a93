use log::debug;
use serde::Serialize;

use crate::angle::radians_to_degrees;
use crate::compass::{Direction, heading_to_direction};
use crate::position::Position;
use crate::rotation::DeviceOrientation;

/// One push from the platform sensors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorEvent {
    Location(Position),
    /// Magnetic heading in degrees.
    Heading(f64),
    Orientation(DeviceOrientation),
}

/// What the display should show after a heading update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CompassReading {
    /// Radians to rotate the dial by.
    pub rotation: f64,
    /// Heading wrapped into [0, 360).
    pub heading: f64,
    /// Whole degrees for the readout, truncated.
    pub heading_degrees: i64,
    pub direction: Direction,
    /// Signed bearing to the target in degrees.
    pub bearing_degrees: f64,
    pub distance_m: Option<f64>,
}

/// Coordinate readout after a location update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoordinateReadout {
    pub position: Position,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Update {
    Coordinates(CoordinateReadout),
    Heading(CompassReading),
}

/// Folds sensor events into compass readings, one event at a time.
pub struct CompassTracker {
    current_position: Option<Position>,
    target: Position,
    orientation: DeviceOrientation,
}

impl CompassTracker {
    pub fn new(target: Position) -> Self {
        Self::with_orientation(target, DeviceOrientation::default())
    }

    pub fn with_orientation(target: Position, orientation: DeviceOrientation) -> Self {
        Self {
            current_position: None,
            target,
            orientation,
        }
    }

    pub fn get_current_position(&self) -> Option<Position> {
        self.current_position
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn set_target(&mut self, target: Position) {
        debug!("Tracker target changed to {target}");
        self.target = target;
    }

    pub fn orientation(&self) -> DeviceOrientation {
        self.orientation
    }

    /// Bearing in radians from the latest fix to the target, 0 until located.
    pub fn bearing(&self) -> f64 {
        self.current_position
            .map(|pos| pos.bearing_to(&self.target))
            .unwrap_or(0.0)
    }

    pub fn reading(&self, heading: f64) -> CompassReading {
        let (direction, normalized) = heading_to_direction(heading);
        let bearing = self.bearing();
        CompassReading {
            rotation: self.orientation.rotation(bearing, heading),
            heading: normalized,
            heading_degrees: normalized.trunc() as i64,
            direction,
            bearing_degrees: radians_to_degrees(bearing),
            distance_m: self
                .current_position
                .map(|pos| pos.distance_to(&self.target)),
        }
    }

    pub fn handle(&mut self, event: SensorEvent) -> Option<Update> {
        match event {
            SensorEvent::Location(position) => {
                self.current_position = Some(position);
                Some(Update::Coordinates(CoordinateReadout {
                    position,
                    latitude: position.latitude_label(),
                    longitude: position.longitude_label(),
                }))
            }
            SensorEvent::Heading(heading) => Some(Update::Heading(self.reading(heading))),
            SensorEvent::Orientation(orientation) => {
                self.orientation = orientation;
                None
            }
        }
    }

    /// Drains `events` synchronously, handing every update to `sink`.
    pub fn run<I, F>(&mut self, events: I, mut sink: F)
    where
        I: IntoIterator<Item = SensorEvent>,
        F: FnMut(Update),
    {
        for event in events {
            if let Some(update) = self.handle(event) {
                sink(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::ScreenOrientation;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_tracker_initialization() {
        let tracker = CompassTracker::new(Position::NORTH_POLE);
        assert!(tracker.get_current_position().is_none());
        assert_eq!(tracker.target(), Position::NORTH_POLE);
        assert_eq!(tracker.orientation(), DeviceOrientation::default());
        assert_eq!(tracker.bearing(), 0.0);
    }

    #[test]
    fn test_heading_without_fix() {
        let mut tracker = CompassTracker::new(Position::NORTH_POLE);
        let Some(Update::Heading(reading)) = tracker.handle(SensorEvent::Heading(0.0)) else {
            panic!("expected a heading update");
        };
        assert_eq!(reading.rotation, 0.0);
        assert_eq!(reading.direction, Direction::N);
        assert_eq!(reading.heading_degrees, 0);
        assert!(reading.distance_m.is_none());
    }

    #[test]
    fn test_location_then_heading() {
        let mut tracker = CompassTracker::new(Position::new(0.0, 90.0));

        let update = tracker.handle(SensorEvent::Location(Position::new(0.0, 0.0)));
        let Some(Update::Coordinates(readout)) = update else {
            panic!("expected coordinates");
        };
        assert_eq!(readout.latitude, "0.0º N");
        assert_eq!(readout.longitude, "0.0º E");
        assert!((tracker.bearing() - PI / 2.0).abs() < EPSILON);

        // facing the target: dial sits still
        let Some(Update::Heading(reading)) = tracker.handle(SensorEvent::Heading(90.7)) else {
            panic!("expected a heading update");
        };
        assert!((reading.rotation - (-0.7f64).to_radians()).abs() < EPSILON);
        assert_eq!(reading.heading_degrees, 90);
        assert_eq!(reading.direction, Direction::E);
        assert!((reading.bearing_degrees - 90.0).abs() < EPSILON);
        assert!(reading.distance_m.is_some());
    }

    #[test]
    fn test_orientation_event_changes_rotation() {
        let mut tracker = CompassTracker::new(Position::NORTH_POLE);
        let orientation = DeviceOrientation::new(ScreenOrientation::LandscapeLeft, false);
        assert!(tracker.handle(SensorEvent::Orientation(orientation)).is_none());

        let reading = tracker.reading(0.0);
        assert!((reading.rotation - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_first_reading_uses_initial_orientation() {
        let orientation = DeviceOrientation::new(ScreenOrientation::LandscapeLeft, false);
        let mut tracker = CompassTracker::with_orientation(Position::NORTH_POLE, orientation);
        assert_eq!(tracker.orientation(), orientation);

        let Some(Update::Heading(reading)) = tracker.handle(SensorEvent::Heading(0.0)) else {
            panic!("expected a heading update");
        };
        assert!((reading.rotation - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_set_target() {
        let mut tracker = CompassTracker::new(Position::NORTH_POLE);
        tracker.handle(SensorEvent::Location(Position::new(0.0, 0.0)));
        assert!(tracker.bearing().abs() < EPSILON);

        tracker.set_target(Position::new(0.0, -90.0));
        assert!((tracker.bearing() + PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_run_consumes_stream() {
        let mut tracker = CompassTracker::new(Position::NORTH_POLE);
        let events = vec![
            SensorEvent::Heading(45.0),
            SensorEvent::Location(Position::new(48.057440, -123.119625)),
            SensorEvent::Orientation(DeviceOrientation::default()),
            SensorEvent::Heading(-90.0),
        ];

        let mut updates = Vec::new();
        tracker.run(events, |update| updates.push(update));

        assert_eq!(updates.len(), 3);
        assert!(matches!(updates[1], Update::Coordinates(_)));
        let Update::Heading(last) = &updates[2] else {
            panic!("expected a heading update");
        };
        assert_eq!(last.direction, Direction::W);
        assert_eq!(last.heading_degrees, 270);
    }

    #[test]
    fn test_update_serializes_with_kind() -> anyhow::Result<()> {
        let tracker = CompassTracker::new(Position::NORTH_POLE);
        let json = serde_json::to_value(Update::Heading(tracker.reading(180.0)))?;
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["direction"], "S");
        assert_eq!(json["heading_degrees"], 180);
        Ok(())
    }
}
