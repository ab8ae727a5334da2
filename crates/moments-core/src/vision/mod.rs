//! Image analysis through a cloud vision API.
//!
//! [`ImageAnalyzer`] is the seam the reconciler talks to; the Azure Computer
//! Vision client is the production backend.

pub(crate) mod analyzer;
pub(crate) mod azure;

pub use analyzer::{ImageAnalysis, ImageAnalyzer, NO_ALT_TEXT, NO_CAPTION, NO_TAGS};
pub use azure::{interpret_response, AnalyzeResponse, AzureVisionClient};
