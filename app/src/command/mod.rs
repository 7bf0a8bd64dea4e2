//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::path::Path;
use std::sync::Arc;

use sbarro_config::Config;
use sbarro_core::{SbarroSensor, VisionService};
use sbarro_providers::{HttpVisionService, StaticVisionService};
use tracing::info;

mod info;
mod init;
mod poll;
mod version;
mod watch;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use poll::{PollInput, PollStrategy};
pub use version::VersionStrategy;
pub use watch::{WatchInput, WatchStrategy};

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Build the vision service the config points at.
///
/// Static labels win over the HTTP endpoint so a machine can be dry-run
/// without a detector.
fn build_vision(config: &Config, vision_name: &str) -> anyhow::Result<Arc<dyn VisionService>> {
    if !config.vision.static_labels.is_empty() {
        info!(
            "Using {} static labels for vision service {vision_name}",
            config.vision.static_labels.len()
        );
        let service = StaticVisionService::new(vision_name, config.vision.static_labels.clone());
        return Ok(Arc::new(service));
    }

    let service = HttpVisionService::new(
        vision_name,
        config.vision.url.clone(),
        config.vision.timeout(),
    )?;

    let service = match &config.vision.api_key {
        Some(api_key) => service.with_api_key(api_key.clone()),
        None => service,
    };
    Ok(Arc::new(service))
}

fn build_sensor(config: &Config) -> anyhow::Result<SbarroSensor> {
    let attributes = config.sensor_attributes()?;
    let vision = build_vision(config, &attributes.base_vision_name)?;
    Ok(SbarroSensor::new(config.sensor.name.clone(), attributes, vision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_labels_build_a_working_sensor() {
        let config = Config::parse(
            r#"{
                "sensor": {
                    "name": "front-counter",
                    "attributes": {"base_camera_name": "camera-1", "base_vision_name": "vision-1"}
                },
                "vision": {"static_labels": ["pizza_12_20241209_184330"]}
            }"#,
        )
        .expect("config");

        let sensor = build_sensor(&config).expect("sensor");
        assert_eq!(sensor.name(), "front-counter");
        assert_eq!(sensor.vision().name(), "vision-1");

        let readings = sensor.get_readings().await.expect("readings");
        assert_eq!(readings.len(), 1);
        assert_eq!(readings.readings[0].total_trays, 12);
        assert_eq!(readings.readings[0].initial_timestamp, "20241209_184330");
    }

    #[test]
    fn http_service_is_named_after_vision_attribute() {
        let config = Config::parse(
            r#"{"sensor": {"attributes": {"base_camera_name": "camera-1", "base_vision_name": "detector"}}}"#,
        )
        .expect("config");

        let sensor = build_sensor(&config).expect("sensor");
        assert_eq!(sensor.vision().name(), "detector");
        assert_eq!(sensor.attributes().base_camera_name, "camera-1");
    }
}
