use anyhow::Context;
use sbarro_core::SensorAttributes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub sensor: SensorConfig,
    #[serde(default)]
    pub vision: VisionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SensorConfig {
    #[serde(default = "SensorConfig::default_name")]
    pub name: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl SensorConfig {
    fn default_name() -> String {
        sbarro_core::MODEL.name.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VisionConfig {
    #[serde(default = "VisionConfig::default_url")]
    pub url: String,
    #[serde(default = "VisionConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// When non-empty, the sensor reads these labels instead of calling `url`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_labels: Vec<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            timeout_secs: Self::default_timeout_secs(),
            api_key: None,
            static_labels: Vec::new(),
        }
    }
}

impl VisionConfig {
    fn default_url() -> String {
        "http://localhost:8080".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        10
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "sensor": {
    "name": "sbarro-data",
    "attributes": {
      "base_camera_name": "camera-1",
      "base_vision_name": "vision-1"
    }
  },
  "vision": {
    "url": "http://localhost:8080",
    "timeout_secs": 10
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("sbarro"))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Read and validate a config file.
    ///
    /// A missing `base_camera_name` or `base_vision_name` fails here, before
    /// any sensor is built.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'sbarro init' to create config.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.sensor_attributes()?;
        Ok(config)
    }

    pub fn sensor_attributes(&self) -> anyhow::Result<SensorAttributes> {
        Ok(SensorAttributes::from_attributes(&self.sensor.attributes)?)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::create_config_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Set base_camera_name and base_vision_name for your machine");
        println!("   2. Point vision.url at the vision service");
        println!("   3. Run 'sbarro poll' to take a reading");
        println!();
        println!("🔧 Configuration options:");
        println!("   - vision.timeout_secs: request timeout for the vision service");
        println!("   - vision.api_key: bearer token sent with each request");
        println!("   - vision.static_labels: serve fixed labels instead of calling the service");
        println!();
        Ok(())
    }

    pub fn create_config_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}
