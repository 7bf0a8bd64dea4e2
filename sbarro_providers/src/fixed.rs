use async_trait::async_trait;
use sbarro_core::{Detection, VisionService};
use tracing::debug;

/// Vision service that always reports the same labels.
///
/// Used for dry runs of the sensor without a detector on the network.
pub struct StaticVisionService {
    name: String,
    labels: Vec<String>,
}

impl StaticVisionService {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }
}

#[async_trait]
impl VisionService for StaticVisionService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn detections_from_camera(&self, camera_name: &str) -> anyhow::Result<Vec<Detection>> {
        debug!(
            "Static vision service {} serving {} labels for {camera_name}",
            self.name,
            self.labels.len()
        );
        Ok(self.labels.iter().map(Detection::labelled).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_labels_in_order() {
        let vision = StaticVisionService::new(
            "vision-1",
            vec!["pizza_12_20241209_184330".into(), "pizza_3_20241210_090000".into()],
        );
        let detections = vision
            .detections_from_camera("camera-1")
            .await
            .expect("static detections");
        let labels: Vec<&str> = detections.iter().map(|d| d.class_name.as_str()).collect();
        assert_eq!(labels, ["pizza_12_20241209_184330", "pizza_3_20241210_090000"]);
        assert!(detections.iter().all(|d| (d.confidence - 1.0).abs() < f64::EPSILON));
    }
}
