use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::VisionService;
use crate::error::{Error, Result};
use crate::reading::{Readings, extract};

pub const BASE_CAMERA_NAME: &str = "base_camera_name";
pub const BASE_VISION_NAME: &str = "base_vision_name";

/// Registry triple identifying this sensor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Model {
    pub namespace: &'static str,
    pub family: &'static str,
    pub name: &'static str,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

pub const MODEL: Model = Model {
    namespace: "brad-grigsby",
    family: "my-sbarro-sensor",
    name: "sbarro-data",
};

/// The two settings the sensor cannot run without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorAttributes {
    pub base_camera_name: String,
    pub base_vision_name: String,
}

impl SensorAttributes {
    #[must_use]
    pub fn new(base_camera_name: impl Into<String>, base_vision_name: impl Into<String>) -> Self {
        Self {
            base_camera_name: base_camera_name.into(),
            base_vision_name: base_vision_name.into(),
        }
    }

    /// Validate a raw attribute map.
    ///
    /// Both names must be present and be non-empty strings.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            base_camera_name: required_string(attributes, BASE_CAMERA_NAME)?,
            base_vision_name: required_string(attributes, BASE_VISION_NAME)?,
        })
    }
}

fn required_string(attributes: &Map<String, Value>, name: &'static str) -> Result<String> {
    match attributes.get(name) {
        None | Some(Value::Null) => Err(Error::MissingAttribute(name)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Error::InvalidAttribute {
            name,
            reason: "must not be empty".to_string(),
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::InvalidAttribute {
            name,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

/// Tray-count sensor backed by a vision service.
///
/// Each poll asks the vision service for detections on the configured camera
/// and converts every detection label into a [`crate::Reading`]. The sensor
/// holds no state between polls.
pub struct SbarroSensor {
    name: String,
    attributes: SensorAttributes,
    vision: Arc<dyn VisionService>,
}

impl SbarroSensor {
    pub fn new(
        name: impl Into<String>,
        attributes: SensorAttributes,
        vision: Arc<dyn VisionService>,
    ) -> Self {
        let name = name.into();
        info!(
            "Creating sensor {} (camera={}, vision={})",
            name, attributes.base_camera_name, attributes.base_vision_name
        );
        Self {
            name,
            attributes,
            vision,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn attributes(&self) -> &SensorAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn vision(&self) -> &dyn VisionService {
        self.vision.as_ref()
    }

    /// Swap in new attributes together with the vision service that
    /// `attributes.base_vision_name` now refers to.
    pub fn reconfigure(&mut self, attributes: SensorAttributes, vision: Arc<dyn VisionService>) {
        info!(
            "Reconfiguring {} (camera={}, vision={})",
            self.name, attributes.base_camera_name, attributes.base_vision_name
        );
        self.attributes = attributes;
        self.vision = vision;
    }

    pub async fn get_readings(&self) -> Result<Readings> {
        self.get_readings_at(Local::now().naive_local()).await
    }

    /// Poll the vision service once and stamp the readings with `now`.
    pub async fn get_readings_at(&self, now: NaiveDateTime) -> Result<Readings> {
        let camera = &self.attributes.base_camera_name;
        let detections = self
            .vision
            .detections_from_camera(camera)
            .await
            .map_err(Error::Vision)?;

        debug!(
            "Vision service {} returned {} detections for {}",
            self.vision.name(),
            detections.len(),
            camera
        );

        let readings = extract(detections.iter().map(|d| d.class_name.as_str()), now)?;
        Ok(Readings::from(readings))
    }
}

impl fmt::Debug for SbarroSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SbarroSensor")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("vision", &self.vision.name())
            .finish()
    }
}
