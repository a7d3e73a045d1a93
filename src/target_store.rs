//! Persistent storage of the location the compass points at.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::config::{
    DEFAULT_TARGET_LATITUDE, DEFAULT_TARGET_LONGITUDE, TARGET_LATITUDE_KEY, TARGET_LONGITUDE_KEY,
};
use crate::position::Position;

/// Minimal key-value persistence for numeric settings.
pub trait KeyValueStore {
    fn get_f64(&self, key: &str) -> Result<Option<f64>>;

    /// Writes every entry or none of them.
    fn set_many(&mut self, entries: &[(&str, f64)]) -> Result<()>;

    fn set_f64(&mut self, key: &str, value: f64) -> Result<()> {
        self.set_many(&[(key, value)])
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.values.get(key).copied())
    }

    fn set_many(&mut self, entries: &[(&str, f64)]) -> Result<()> {
        for (key, value) in entries {
            self.values.insert(key.to_string(), *value);
        }
        Ok(())
    }
}

/// Stores values as a flat JSON object. Every write replaces the whole file
/// through a sibling temp file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, f64>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store {}", self.path.display()))?;
        serde_json::from_str(&raw).with_context(|| {
            format!("Store {} is not a JSON object of numbers", self.path.display())
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set_many(&mut self, entries: &[(&str, f64)]) -> Result<()> {
        let mut values = self.read_all()?;
        for (key, value) in entries {
            values.insert(key.to_string(), *value);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(&values).context("Failed to serialize store")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .with_context(|| format!("Failed to write store {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace store {}", self.path.display()))?;
        debug!("Stored {:?} in {}", entries, self.path.display());
        Ok(())
    }
}

/// The saved target location, defaulting to the North Pole.
pub struct TargetLocation<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TargetLocation<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the target; each coordinate that was never saved takes its default.
    pub fn load(&self) -> Result<Position> {
        let latitude = self
            .store
            .get_f64(TARGET_LATITUDE_KEY)?
            .unwrap_or(DEFAULT_TARGET_LATITUDE);
        let longitude = self
            .store
            .get_f64(TARGET_LONGITUDE_KEY)?
            .unwrap_or(DEFAULT_TARGET_LONGITUDE);
        Ok(Position::new(latitude, longitude))
    }

    /// Like [`TargetLocation::load`], but an unreadable store points at the
    /// North Pole instead of failing.
    pub fn load_or_default(&self) -> Position {
        self.load().unwrap_or_else(|e| {
            warn!("Ignoring saved target: {e:#}");
            Position::NORTH_POLE
        })
    }

    pub fn set(&mut self, target: Position) -> Result<()> {
        let target = Position::try_new(target.latitude, target.longitude)
            .context("Refusing to save target")?;
        self.store.set_many(&[
            (TARGET_LATITUDE_KEY, target.latitude),
            (TARGET_LONGITUDE_KEY, target.longitude),
        ])?;
        info!("Target location set to {target}");
        Ok(())
    }
}
