use std::path::PathBuf;

use tracing::info;

use super::{build_sensor, load_config};

/// Input parameters for the Poll command strategy.
#[derive(Debug, Clone)]
pub struct PollInput {
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Print on a single line instead of pretty JSON
    pub compact: bool,
}

/// Strategy for taking a single reading.
///
/// Loads and validates the config, builds the sensor, polls it once and
/// prints `{"readings": [...]}` to stdout.
#[derive(Debug, Clone, Copy)]
pub struct PollStrategy;

impl super::CommandStrategy for PollStrategy {
    type Input = PollInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = load_config(input.config_path.as_deref())?;
        let sensor = build_sensor(&config)?;

        let readings = sensor.get_readings().await?;
        info!("{} produced {} readings", sensor.name(), readings.len());

        let output = if input.compact {
            serde_json::to_string(&readings)?
        } else {
            serde_json::to_string_pretty(&readings)?
        };
        println!("{output}");

        Ok(())
    }
}
