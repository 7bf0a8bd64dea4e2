use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use sbarro_core::{Readings, SbarroSensor};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use super::{build_sensor, load_config};

/// Input parameters for the Watch command strategy.
#[derive(Debug, Clone)]
pub struct WatchInput {
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Seconds between polls
    pub interval_secs: u64,
    /// Stop after this many polls; run until Ctrl-C when unset
    pub count: Option<u64>,
}

/// Strategy for polling the sensor on a fixed interval.
///
/// Prints one JSON line per poll. A failed poll is logged and the loop keeps
/// going; the sensor itself never retries.
#[derive(Debug, Clone, Copy)]
pub struct WatchStrategy;

impl super::CommandStrategy for WatchStrategy {
    type Input = WatchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if input.interval_secs == 0 {
            anyhow::bail!("Interval must be at least one second");
        }

        let config = load_config(input.config_path.as_deref())?;
        let sensor = build_sensor(&config)?;

        info!("Watching {} every {}s", sensor.name(), input.interval_secs);

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        };

        run_watch(
            &sensor,
            Duration::from_secs(input.interval_secs),
            input.count,
            shutdown,
            |readings| {
                println!("{}", serde_json::to_string(readings)?);
                Ok(())
            },
        )
        .await?;

        Ok(())
    }
}

/// Poll `sensor` every `period` until `count` polls are done or `shutdown`
/// resolves. Returns the number of polls started.
///
/// `shutdown` lives for the whole loop and is raced against both the tick
/// and the in-flight poll, so an interrupt is never missed.
async fn run_watch<S, F>(
    sensor: &SbarroSensor,
    period: Duration,
    count: Option<u64>,
    shutdown: S,
    mut emit: F,
) -> anyhow::Result<u64>
where
    S: Future<Output = ()>,
    F: FnMut(&Readings) -> anyhow::Result<()>,
{
    tokio::pin!(shutdown);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut polls = 0u64;
    while count.is_none_or(|count| polls < count) {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => {
                info!("Interrupted after {polls} polls");
                break;
            }
        }

        polls += 1;
        tokio::select! {
            result = sensor.get_readings() => match result {
                Ok(readings) => emit(&readings)?,
                Err(e) => warn!("Poll {polls} failed: {e}"),
            },
            () = &mut shutdown => {
                info!("Interrupted during poll {polls}");
                break;
            }
        }
    }

    Ok(polls)
}
