use crate::angle::degrees_to_radians;

/// How long a presentation layer should take to animate to a new rotation.
pub const ROTATION_ANIMATION_SECS: f64 = 0.5;

/// Which way the screen content is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScreenOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    Unknown,
}

/// Screen layout plus whether the device is lying face down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceOrientation {
    pub screen: ScreenOrientation,
    pub face_down: bool,
}

impl DeviceOrientation {
    pub fn new(screen: ScreenOrientation, face_down: bool) -> Self {
        Self { screen, face_down }
    }

    /// Offset in degrees that keeps the dial upright for the current layout.
    pub fn adjustment_degrees(&self) -> f64 {
        match self.screen {
            ScreenOrientation::LandscapeLeft => 90.0,
            ScreenOrientation::LandscapeRight => -90.0,
            ScreenOrientation::Portrait | ScreenOrientation::Unknown => 0.0,
            ScreenOrientation::PortraitUpsideDown if self.face_down => 180.0,
            ScreenOrientation::PortraitUpsideDown => -180.0,
        }
    }

    pub fn adjustment_radians(&self) -> f64 {
        degrees_to_radians(self.adjustment_degrees())
    }

    /// Rotation for the compass graphic in this orientation.
    /// See [`display_rotation`].
    pub fn rotation(&self, bearing: f64, heading_degrees: f64) -> f64 {
        display_rotation(
            self.adjustment_radians(),
            self.face_down,
            bearing,
            heading_degrees,
        )
    }
}

/// Angle in radians to rotate the compass graphic by.
///
/// `bearing` is the bearing to the target in radians, `heading_degrees` the
/// magnetic heading reported by the sensor. Lying face down mirrors the dial.
pub fn display_rotation(
    adjustment: f64,
    face_down: bool,
    bearing: f64,
    heading_degrees: f64,
) -> f64 {
    let relative = bearing - degrees_to_radians(heading_degrees);
    let sign = if face_down { -1.0 } else { 1.0 };
    adjustment + sign * relative
}
