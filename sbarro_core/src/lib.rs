#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod reading;
pub mod sensor;

pub use error::{Error, Result};
pub use reading::{Label, Reading, Readings, TIMESTAMP_FORMAT, extract};
pub use sensor::{MODEL, Model, SbarroSensor, SensorAttributes};

/// A single object-recognition result returned by a vision service.
///
/// Only `class_name` is consumed by the sensor; the bounding box and
/// confidence are carried so the full detection can be logged or forwarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub class_name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_max: Option<i64>,
}

impl Detection {
    #[must_use]
    pub fn labelled(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            confidence: 1.0,
            ..Self::default()
        }
    }
}

/// Source of detections for a named camera.
///
/// Timeouts, connectivity and response decoding belong to the implementation;
/// the sensor hands any error straight back to its caller.
#[async_trait]
pub trait VisionService: Send + Sync {
    fn name(&self) -> &str;
    async fn detections_from_camera(&self, camera_name: &str) -> anyhow::Result<Vec<Detection>>;
}
