use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use sbarro_core::{Detection, VisionService};
use serde_json::json;
use tracing::{debug, info};

/// Vision service reached over HTTP.
///
/// Issues `POST {base_url}/vision/{name}/detections_from_camera` with
/// `{"name": ..., "camera_name": ...}` and expects `{"detections": [...]}`
/// back. Failed requests are returned as-is; there is no retry.
pub struct HttpVisionService {
    client: Client,
    name: String,
    base_url: String,
    api_key: Option<String>,
}

impl HttpVisionService {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Creating HttpVisionService {name} at {base_url}");

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            name,
            base_url,
            api_key: None,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/vision/{}/detections_from_camera", self.base_url, self.name)
    }
}

fn parse_detections(response: &serde_json::Value) -> anyhow::Result<Vec<Detection>> {
    let detections = response
        .get("detections")
        .filter(|d| d.is_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing detections"))?;

    serde_json::from_value(detections.clone()).context("Invalid detection in response")
}

#[async_trait]
impl VisionService for HttpVisionService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn detections_from_camera(&self, camera_name: &str) -> anyhow::Result<Vec<Detection>> {
        let mut request = self.client.post(self.endpoint()).json(&json!({
            "name": self.name,
            "camera_name": camera_name,
        }));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!("Requesting detections from {} for {camera_name}", self.name);

        let response = request
            .send()
            .await
            .with_context(|| format!("Vision service {} request failed", self.name))?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_detections(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let vision =
            HttpVisionService::new("vision-1", "http://localhost:8080/", Duration::from_secs(1))
                .expect("client");
        assert_eq!(
            vision.endpoint(),
            "http://localhost:8080/vision/vision-1/detections_from_camera"
        );
    }

    #[test]
    fn parses_full_and_minimal_detections() {
        let detections = parse_detections(&json!({
            "detections": [
                {
                    "x_min": 1, "y_min": 2, "x_max": 30, "y_max": 40,
                    "confidence": 0.87,
                    "class_name": "pizza_12_20241209_184330"
                },
                { "class_name": "pizza_3_20241210_090000" }
            ]
        }))
        .expect("parse");

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].class_name, "pizza_12_20241209_184330");
        assert_eq!(detections[0].x_max, Some(30));
        assert_eq!(detections[1].class_name, "pizza_3_20241210_090000");
        assert_eq!(detections[1].x_min, None);
    }

    #[test]
    fn missing_detections_is_an_error() {
        let err = parse_detections(&json!({ "results": [] })).unwrap_err();
        assert!(err.to_string().contains("missing detections"));
    }

    #[test]
    fn detection_without_class_name_is_an_error() {
        assert!(parse_detections(&json!({ "detections": [{ "confidence": 0.5 }] })).is_err());
    }
}
