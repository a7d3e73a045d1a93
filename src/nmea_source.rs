use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error, info};
use nmea::{Nmea, SentenceType};

use crate::position::Position;
use crate::tracker::SensorEvent;

/// Turns a stream of NMEA sentences into location (and optionally course) events.
pub struct NmeaSource<R: BufRead> {
    lines: Lines<R>,
    nmea: Nmea,
    course_headings: bool,
    pending: Option<SensorEvent>,
    satellites: Option<u32>,
}

impl NmeaSource<BufReader<File>> {
    /// Opens a serial device such as `/dev/serial0`, or a recorded log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening {}...", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open GPS at {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> NmeaSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            nmea: Nmea::default(),
            course_headings: false,
            pending: None,
            satellites: None,
        }
    }

    /// Also emit the GPS course over ground as a heading. Only useful while
    /// moving, and when no magnetometer is fitted.
    pub fn with_course_headings(mut self, enabled: bool) -> Self {
        self.course_headings = enabled;
        self
    }

    /// Satellites in the last GGA fix.
    pub fn satellites(&self) -> Option<u32> {
        self.satellites
    }

    fn track_satellites(&mut self) {
        let satellites = self.nmea.num_of_fix_satellites;
        if satellites != self.satellites {
            if let Some(num_sats) = satellites {
                debug!("Satellites used: {}", num_sats);
            }
            self.satellites = satellites;
        }
    }

    fn events_for(&self, sentence: SentenceType) -> (Option<SensorEvent>, Option<SensorEvent>) {
        let location = match sentence {
            SentenceType::GGA | SentenceType::RMC | SentenceType::GLL => {
                match (self.nmea.latitude, self.nmea.longitude) {
                    (Some(lat), Some(lon)) => Some(SensorEvent::Location(Position::new(lat, lon))),
                    _ => None,
                }
            }
            _ => None,
        };

        let heading = match sentence {
            SentenceType::RMC | SentenceType::VTG if self.course_headings => self
                .nmea
                .true_course
                .map(|course| SensorEvent::Heading(course.into())),
            _ => None,
        };

        (location, heading)
    }
}

impl<R: BufRead> Iterator for NmeaSource<R> {
    type Item = SensorEvent;

    fn next(&mut self) -> Option<SensorEvent> {
        if let Some(event) = self.pending.take() {
            return Some(event);
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    error!("Error reading GPS data: {}", e);
                    return None;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let sentence = match self.nmea.parse(trimmed) {
                Ok(sentence) => sentence,
                Err(e) => {
                    debug!("Skipping '{}': {}", trimmed, e);
                    continue;
                }
            };

            if sentence == SentenceType::GGA {
                self.track_satellites();
            }

            match self.events_for(sentence) {
                (Some(location), heading) => {
                    self.pending = heading;
                    return Some(location);
                }
                (None, Some(heading)) => return Some(heading),
                (None, None) => continue,
            }
        }
    }
}
