mod schema;

pub use schema::{Config, SensorConfig, VisionConfig};
