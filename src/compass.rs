use serde::Serialize;

use crate::angle::normalize_degrees;

/// Translates numeric headings to 8-point compass directions. (N, NE, E, etc.)
/// Represents an 8-point compass rose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    N,  // north
    NE, // northeast
    E,  // east
    SE, // southeast
    S,  // south
    SW, // southwest
    W,  // west
    NW, // northwest
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl Direction {
    pub fn name(&self) -> &str {
        match self {
            Direction::N => "north",
            Direction::NE => "northeast",
            Direction::E => "east",
            Direction::SE => "southeast",
            Direction::S => "south",
            Direction::SW => "southwest",
            Direction::W => "west",
            Direction::NW => "northwest",
        }
    }

    pub fn abbreviation(&self) -> &str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }
}

/// Convert the heading to an 8-point compass direction.
///
/// The buckets are closed on their upper edge and deliberately uneven
/// (SE spans 54°, S spans 36°), matching the labels printed on the dial.
/// Returns the direction together with the heading wrapped into [0, 360).
pub fn heading_to_direction(heading: f64) -> (Direction, f64) {
    let normalized = normalize_degrees(heading);

    let direction = match normalized {
        h if h <= 23.0 => Direction::N,
        h if h <= 67.0 => Direction::NE,
        h if h <= 113.0 => Direction::E,
        h if h <= 167.0 => Direction::SE,
        h if h <= 203.0 => Direction::S,
        h if h <= 247.0 => Direction::SW,
        h if h <= 293.0 => Direction::W,
        h if h <= 337.0 => Direction::NW,
        // (337, 360) and NaN
        _ => Direction::N,
    };
    (direction, normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(heading: f64) -> Direction {
        heading_to_direction(heading).0
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Direction::N), "N");
        assert_eq!(format!("{}", Direction::NW), "NW");
        assert_eq!(format!("{}", Direction::SE), "SE");
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::N.name(), "north");
        assert_eq!(Direction::NE.name(), "northeast");
        assert_eq!(Direction::SW.abbreviation(), "SW");
    }

    #[test]
    fn test_north_bucket_edges() {
        assert_eq!(label(0.0), Direction::N);
        assert_eq!(label(23.0), Direction::N);
        assert_eq!(label(23.0001), Direction::NE);
        assert_eq!(label(337.0001), Direction::N);
        assert_eq!(label(359.0), Direction::N);
    }

    #[test]
    fn test_bucket_upper_edges() {
        assert_eq!(label(67.0), Direction::NE);
        assert_eq!(label(67.5), Direction::E);
        assert_eq!(label(113.0), Direction::E);
        assert_eq!(label(113.5), Direction::SE);
        assert_eq!(label(167.0), Direction::SE);
        assert_eq!(label(180.0), Direction::S);
        assert_eq!(label(203.0), Direction::S);
        assert_eq!(label(247.0), Direction::SW);
        assert_eq!(label(270.0), Direction::W);
        assert_eq!(label(293.0), Direction::W);
        assert_eq!(label(337.0), Direction::NW);
    }

    #[test]
    fn test_heading_normalization() {
        let (dir, heading) = heading_to_direction(370.0);
        assert_eq!(heading, 10.0);
        assert_eq!(dir, Direction::N);

        let (dir, heading) = heading_to_direction(-10.0);
        assert_eq!(heading, 350.0);
        assert_eq!(dir, Direction::N);

        let (dir, heading) = heading_to_direction(-90.0);
        assert_eq!(heading, 270.0);
        assert_eq!(dir, Direction::W);

        assert_eq!(label(720.0 + 180.0), Direction::S);
    }

    #[test]
    fn test_nan_heading_is_north() {
        assert_eq!(label(f64::NAN), Direction::N);
    }
}
