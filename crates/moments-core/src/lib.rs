//! Moments Core - caption and tag a photo gallery with a cloud vision API.
//!
//! Images are sent to Azure Computer Vision, which returns a caption and a
//! set of tags. Those results are upserted into a SQLite gallery of photos
//! and tags, one all-or-nothing transaction per directory.
//!
//! # Architecture
//!
//! ```text
//! Directory → Discover → Analyze (vision API) → Reconcile (Photo, Tag, photo_tags) → Commit
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use moments_core::{AzureVisionClient, Config, Gallery, Reconciler};
//!
//! #[tokio::main]
//! async fn main() -> moments_core::Result<()> {
//!     let config = Config::load()?;
//!     let client = AzureVisionClient::new(&config.vision)?;
//!     let mut gallery = Gallery::open(&config.database_path())?;
//!
//!     let reconciler = Reconciler::from_config(Box::new(client), &config.gallery);
//!     let report = reconciler.reconcile_dir(&mut gallery, "./uploads".as_ref()).await?;
//!     println!("{} photo(s) created", report.photos_created);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod discovery;
pub mod error;
pub mod gallery;
pub mod reconcile;
pub mod vision;

// Re-exports for convenient access
pub use config::{Config, DescriptionPolicy};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use error::{ConfigError, MomentsError, Result, VisionError};
pub use gallery::{Gallery, GalleryTx, Photo, Tag, TagUpsert};
pub use reconcile::{ImageOutcome, PhotoAction, ReconcileReport, Reconciler};
pub use vision::{AzureVisionClient, ImageAnalysis, ImageAnalyzer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
