//! Analyzer trait and the analysis result shared by all vision backends.

use crate::error::VisionError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;

/// Caption reported when the API returned no caption or failed.
pub const NO_CAPTION: &str = "No description available.";

/// Single tag reported when the API returned no tags or failed.
pub const NO_TAGS: &str = "No tags available.";

/// Alt text reported when there are no tags to join.
pub const NO_ALT_TEXT: &str = "There are no tags.";

/// Caption and tag set produced for one image.
///
/// Missing data is represented by the [`NO_CAPTION`] and [`NO_TAGS`]
/// sentinels. Use [`has_caption`](Self::has_caption) and
/// [`has_tags`](Self::has_tags) before treating either as real content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAnalysis {
    /// One-sentence caption, or [`NO_CAPTION`]
    pub caption: String,
    /// Deduplicated tag names, or exactly `{NO_TAGS}`
    pub tags: BTreeSet<String>,
}

impl ImageAnalysis {
    /// Build an analysis, substituting sentinels for a missing caption or
    /// an empty tag set. Blank captions and tag names count as missing.
    pub fn new<I>(caption: Option<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let caption = caption
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| NO_CAPTION.to_string());

        let mut tags: BTreeSet<String> = tags
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        if tags.is_empty() {
            tags.insert(NO_TAGS.to_string());
        }

        Self { caption, tags }
    }

    /// The "no data" analysis returned for a non-success API response.
    pub fn unavailable() -> Self {
        Self::new(None, std::iter::empty())
    }

    /// Whether the caption is real content rather than the sentinel.
    pub fn has_caption(&self) -> bool {
        self.caption != NO_CAPTION
    }

    /// Whether the tag set is real content rather than the sentinel.
    pub fn has_tags(&self) -> bool {
        !(self.tags.len() == 1 && self.tags.contains(NO_TAGS))
    }

    /// Whether neither caption nor tags carry data.
    pub fn is_unavailable(&self) -> bool {
        !self.has_caption() && !self.has_tags()
    }

    /// Tags that should be persisted: empty when only the sentinel is present.
    pub fn real_tags(&self) -> impl Iterator<Item = &str> {
        let has_tags = self.has_tags();
        self.tags
            .iter()
            .filter(move |_| has_tags)
            .map(String::as_str)
    }

    /// Comma-separated tag list usable as image alt text.
    pub fn alt_text(&self) -> String {
        if self.has_tags() {
            self.tags.iter().cloned().collect::<Vec<_>>().join(", ")
        } else {
            NO_ALT_TEXT.to_string()
        }
    }
}

/// A backend that turns image bytes into an [`ImageAnalysis`].
///
/// Uses `async_trait` so the reconciler can hold a `Box<dyn ImageAnalyzer>`.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Backend name for logging (e.g., "azure").
    fn name(&self) -> &str;

    /// Analyze one encoded image.
    ///
    /// A non-success API status yields [`ImageAnalysis::unavailable`];
    /// transport and decode failures are errors. No retry is attempted.
    async fn analyze(&self, image: &[u8]) -> Result<ImageAnalysis, VisionError>;
}
