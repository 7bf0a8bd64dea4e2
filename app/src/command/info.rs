use std::path::PathBuf;

use sbarro_config::Config;

use super::load_config;

/// Strategy for displaying configuration information.
///
/// Validates the config the same way `poll` does, so a missing camera or
/// vision name is reported here too.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Option<PathBuf>;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let path = match input {
            Some(path) => path,
            None => Config::default_path()?,
        };
        let config = load_config(Some(path.as_path()))?;
        let attributes = config.sensor_attributes()?;

        println!("=== sbarro Configuration ===\n");
        println!("Config: {}", path.display());
        println!("Model: {}", sbarro_core::MODEL);
        println!();

        println!("Sensor:");
        println!("  Name: {}", config.sensor.name);
        println!("  Camera: {}", attributes.base_camera_name);
        println!("  Vision Service: {}", attributes.base_vision_name);
        println!();

        println!("Vision:");
        if config.vision.static_labels.is_empty() {
            println!("  Source: HTTP");
            println!("  URL: {}", config.vision.url);
            println!("  Timeout: {}s", config.vision.timeout_secs);
            println!(
                "  API Key: {}",
                config
                    .vision
                    .api_key
                    .as_deref()
                    .map_or_else(|| "(not set)".to_string(), mask_api_key)
            );
        } else {
            println!("  Source: static");
            for label in &config.vision.static_labels {
                println!("  Label: {label}");
            }
        }

        Ok(())
    }
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.len() > 8 && api_key.is_ascii() {
        format!("{}...{}", &api_key[..4], &api_key[api_key.len() - 4..])
    } else {
        "***".to_string()
    }
}
