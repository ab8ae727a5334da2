//! The `moments analyze` command: caption and tag images without touching the gallery.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use moments_core::{AzureVisionClient, Config, FileDiscovery, ImageAnalysis, ImageAnalyzer};
use serde::Serialize;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file or directory to analyze
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// One line of `analyze` output.
#[derive(Debug, Serialize)]
struct AnalysisRecord {
    file_name: String,
    caption: String,
    tags: Vec<String>,
    alt_text: String,
    /// False when the API returned neither caption nor tags
    has_data: bool,
}

impl AnalysisRecord {
    fn new(file_name: String, analysis: ImageAnalysis) -> Self {
        Self {
            file_name,
            has_data: !analysis.is_unavailable(),
            alt_text: analysis.alt_text(),
            caption: analysis.caption,
            tags: analysis.tags.into_iter().collect(),
        }
    }
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: Config) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let files = FileDiscovery::new(&config.gallery).discover(&args.input)?;
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }

    let client = AzureVisionClient::new(&config.vision)?;
    tracing::debug!("Analyzing {} image(s) with {}", files.len(), client.name());

    let mut records = Vec::with_capacity(files.len());
    let mut failed = 0usize;

    for file in &files {
        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                failed += 1;
                tracing::error!("Failed to read {:?}: {e}", file.path);
                continue;
            }
        };

        match client.analyze(&bytes).await {
            Ok(analysis) => {
                let record = AnalysisRecord::new(file.file_name.clone(), analysis);
                if matches!(args.format, OutputFormat::Jsonl) {
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    records.push(record);
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Failed: {:?} - {e}", file.path);
            }
        }
    }

    if matches!(args.format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    if failed > 0 {
        tracing::warn!("{failed} of {} image(s) could not be analyzed", files.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_real_analysis() {
        let analysis = ImageAnalysis::new(
            Some("a red car".to_string()),
            ["car".to_string(), "street".to_string()],
        );
        let record = AnalysisRecord::new("car.jpg".to_string(), analysis);
        assert!(record.has_data);
        assert_eq!(record.tags, vec!["car", "street"]);
        assert_eq!(record.alt_text, "car, street");
    }

    #[test]
    fn record_from_unavailable_analysis() {
        let record = AnalysisRecord::new("x.png".to_string(), ImageAnalysis::unavailable());
        assert!(!record.has_data);
        assert_eq!(record.caption, moments_core::vision::NO_CAPTION);
        assert_eq!(record.alt_text, moments_core::vision::NO_ALT_TEXT);
    }

    #[test]
    fn record_serializes_expected_fields() {
        let record = AnalysisRecord::new("x.png".to_string(), ImageAnalysis::unavailable());
        let json = serde_json::to_value(&record).unwrap();
        for key in ["file_name", "caption", "tags", "alt_text", "has_data"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn missing_input_is_rejected() {
        let args = AnalyzeArgs {
            input: PathBuf::from("/definitely/not/here.jpg"),
            format: OutputFormat::Json,
        };
        let err = execute(args, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
