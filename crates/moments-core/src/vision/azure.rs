//! Azure Computer Vision client using the `analyze` operation.
//!
//! Posts raw image bytes as `application/octet-stream` and requests the
//! Tags, Description and Categories visual features.

use super::analyzer::{ImageAnalysis, ImageAnalyzer};
use crate::config::{resolve_env_var, VisionConfig};
use crate::error::VisionError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Header carrying the subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Vision client bound to one endpoint and key.
pub struct AzureVisionClient {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AzureVisionClient {
    /// Build a client from config, resolving `${ENV_VAR}` credentials.
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let endpoint = resolve_env_var(&config.endpoint).ok_or_else(|| {
            VisionError::MissingCredential("vision.endpoint (AZURE_VISION_ENDPOINT)".to_string())
        })?;
        let api_key = resolve_env_var(&config.api_key).ok_or_else(|| {
            VisionError::MissingCredential("vision.api_key (AZURE_VISION_KEY)".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VisionError::Request {
                message: format!("Failed to build HTTP client: {e}"),
                status_code: None,
            })?;

        Ok(Self {
            url: analyze_url(&endpoint, &config.api_path, &config.visual_features),
            api_key,
            client,
        })
    }

    /// Full analyze URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn analyze_url(endpoint: &str, api_path: &str, visual_features: &str) -> String {
    format!(
        "{}{}?visualFeatures={}",
        endpoint.trim_end_matches('/'),
        api_path,
        visual_features
    )
}

// --- Response types ---

/// Subset of the analyze response this client reads.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    tags: Option<Vec<NamedItem>>,
    #[serde(default)]
    description: Option<Description>,
    #[serde(default)]
    categories: Option<Vec<NamedItem>>,
}

/// An entry of `tags[]` or `categories[]`.
#[derive(Debug, Deserialize)]
struct NamedItem {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Description {
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    captions: Option<Vec<Caption>>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    text: String,
}

impl ImageAnalysis {
    /// Collapse an analyze response into caption and tag set.
    ///
    /// The caption is the first of `description.captions`. Tags are the
    /// union of `tags[].name`, `description.tags` and `categories[].name`.
    pub fn from_response(response: AnalyzeResponse) -> Self {
        let AnalyzeResponse {
            tags,
            description,
            categories,
        } = response;
        let description = description.unwrap_or_default();

        let caption = description
            .captions
            .and_then(|captions| captions.into_iter().next())
            .map(|c| c.text);

        let object_tags = tags.into_iter().flatten().map(|t| t.name);
        let description_tags = description.tags.into_iter().flatten();
        let category_tags = categories.into_iter().flatten().map(|c| c.name);

        Self::new(
            caption,
            object_tags.chain(description_tags).chain(category_tags),
        )
    }
}

/// Map an HTTP status and body to an analysis.
///
/// Non-success statuses degrade to [`ImageAnalysis::unavailable`]; a success
/// body that isn't valid JSON is a [`VisionError::Decode`].
pub fn interpret_response(status: StatusCode, body: &str) -> Result<ImageAnalysis, VisionError> {
    if !status.is_success() {
        tracing::warn!("Vision API returned HTTP {status}: {body}");
        return Ok(ImageAnalysis::unavailable());
    }

    let response: AnalyzeResponse =
        serde_json::from_str(body).map_err(|e| VisionError::Decode(e.to_string()))?;
    Ok(ImageAnalysis::from_response(response))
}

#[async_trait]
impl ImageAnalyzer for AzureVisionClient {
    fn name(&self) -> &str {
        "azure"
    }

    async fn analyze(&self, image: &[u8]) -> Result<ImageAnalysis, VisionError> {
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| VisionError::Request {
                message: e.to_string(),
                status_code: e.status().map(|s| s.as_u16()),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| VisionError::Request {
            message: format!("Failed to read response body: {e}"),
            status_code: Some(status.as_u16()),
        })?;

        tracing::debug!(
            status = status.as_u16(),
            bytes = image.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Vision API responded"
        );

        let analysis = interpret_response(status, &body)?;
        tracing::trace!("Vision analysis: {analysis:?}");
        Ok(analysis)
    }
}
