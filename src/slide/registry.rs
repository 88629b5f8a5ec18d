//! Driver registry.
//!
//! Maps driver ids to [`SlideDriver`] implementations and opens slides with
//! either an explicit driver or file-name based auto-detection.
//!
//! The registry is a plain value: create one, register drivers, and pass it
//! to whatever needs to open slides. There is no process-wide instance.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{DriverError, IoError};
use crate::format::{match_pattern, ImageDriver};

use super::scene::Scene;

// =============================================================================
// Driver and Slide Traits
// =============================================================================

/// An opened slide file: a container of one or more scenes.
pub trait Slide {
    fn file_path(&self) -> &str;

    fn num_scenes(&self) -> usize;

    /// Scene at `index`, or `None` if out of range.
    fn scene(&self, index: usize) -> Option<&dyn Scene>;

    /// Mutable scene at `index`, needed for block reads.
    fn scene_mut(&mut self, index: usize) -> Option<&mut dyn Scene>;
}

/// A format backend able to open slide files.
pub trait SlideDriver {
    /// Unique driver id, e.g. `"IMAGE"`.
    fn id(&self) -> &str;

    /// Glob patterns of file names the driver handles, separated by `;`.
    fn file_pattern(&self) -> &str;

    /// Whether the driver claims `path` by its file name.
    fn can_open(&self, path: &str) -> bool {
        match_pattern(path, self.file_pattern())
    }

    /// Open a slide file.
    fn open_file(&self, path: &str) -> Result<Box<dyn Slide>, DriverError>;
}

// =============================================================================
// DriverRegistry
// =============================================================================

/// Registry of available slide drivers, keyed by id.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Box<dyn SlideDriver>>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every driver built into this crate.
    pub fn with_default_drivers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ImageDriver::new()));
        registry
    }

    /// Add a driver. A driver already registered under the same id is
    /// replaced.
    pub fn register(&mut self, driver: Box<dyn SlideDriver>) {
        let id = driver.id().to_string();
        if self.drivers.insert(id.clone(), driver).is_some() {
            warn!(driver = %id, "replaced previously registered driver");
        } else {
            debug!(driver = %id, "registered driver");
        }
    }

    /// Registered driver ids, sorted.
    pub fn driver_ids(&self) -> Vec<String> {
        self.drivers.keys().cloned().collect()
    }

    /// Driver registered under `id`.
    pub fn driver(&self, id: &str) -> Option<&dyn SlideDriver> {
        self.drivers.get(id).map(|d| d.as_ref())
    }

    /// First driver, in id order, whose file pattern matches `path`.
    pub fn find_driver(&self, path: &str) -> Option<&dyn SlideDriver> {
        self.drivers
            .values()
            .find(|d| d.can_open(path))
            .map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Open `path` with the driver named `driver_id`.
    ///
    /// An empty `driver_id` selects the driver by file name.
    ///
    /// # Errors
    ///
    /// - `Io(NotFound)` if `path` does not exist
    /// - `UnknownDriver` if `driver_id` is not registered
    /// - `UnsupportedFormat` if auto-detection finds no driver
    /// - any error of the driver's `open_file`
    pub fn open_slide(&self, path: &str, driver_id: &str) -> Result<Box<dyn Slide>, DriverError> {
        if !std::path::Path::new(path).exists() {
            return Err(IoError::NotFound(path.to_string()).into());
        }

        let driver = if driver_id.is_empty() {
            self.find_driver(path)
                .ok_or_else(|| DriverError::UnsupportedFormat {
                    reason: format!("no registered driver matches '{}'", path),
                })?
        } else {
            self.driver(driver_id)
                .ok_or_else(|| DriverError::UnknownDriver(driver_id.to_string()))?
        };

        let slide = driver.open_file(path)?;
        info!(
            path,
            driver = driver.id(),
            scenes = slide.num_scenes(),
            "opened slide"
        );
        Ok(slide)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.driver_ids())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
