//! Gallery reconciliation: bring photo rows in line with vision analysis.
//!
//! One invocation covers a whole directory inside a single transaction.
//! Images are analyzed one at a time; if anything fails (file read, vision
//! transport, database), nothing from the batch is committed.

use std::path::Path;

use crate::config::{DescriptionPolicy, GalleryConfig};
use crate::discovery::{DiscoveredFile, FileDiscovery};
use crate::error::{MomentsError, Result};
use crate::gallery::{Gallery, GalleryTx};
use crate::vision::{ImageAnalysis, ImageAnalyzer};

/// Whether reconciliation inserted or updated a photo row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoAction {
    Created,
    Updated,
}

/// What happened to a single image.
#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub file_name: String,
    pub action: PhotoAction,
    pub analysis: ImageAnalysis,
    /// An existing non-blank description was kept
    pub description_preserved: bool,
    /// Tag rows created for this image
    pub tags_created: usize,
    /// Tags linked to the photo
    pub tags_linked: usize,
}

/// Totals for one reconciliation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub images: usize,
    pub photos_created: usize,
    pub photos_updated: usize,
    pub tags_created: usize,
    pub descriptions_preserved: usize,
    /// Images for which the API returned neither caption nor tags
    pub no_data: usize,
}

impl ReconcileReport {
    fn record(&mut self, outcome: &ImageOutcome) {
        self.images += 1;
        match outcome.action {
            PhotoAction::Created => self.photos_created += 1,
            PhotoAction::Updated => self.photos_updated += 1,
        }
        self.tags_created += outcome.tags_created;
        if outcome.description_preserved {
            self.descriptions_preserved += 1;
        }
        if outcome.analysis.is_unavailable() {
            self.no_data += 1;
        }
    }
}

/// Runs vision analysis over image files and upserts the results.
pub struct Reconciler {
    analyzer: Box<dyn ImageAnalyzer>,
    policy: DescriptionPolicy,
    discovery: FileDiscovery,
}

impl Reconciler {
    /// Create a reconciler that picks up the default image extensions.
    pub fn new(analyzer: Box<dyn ImageAnalyzer>, policy: DescriptionPolicy) -> Self {
        Self {
            analyzer,
            policy,
            discovery: FileDiscovery::new(&GalleryConfig::default()),
        }
    }

    /// Create a reconciler using the policy and extensions from config.
    pub fn from_config(analyzer: Box<dyn ImageAnalyzer>, config: &GalleryConfig) -> Self {
        Self {
            analyzer,
            policy: config.description_policy,
            discovery: FileDiscovery::new(config),
        }
    }

    pub fn policy(&self) -> DescriptionPolicy {
        self.policy
    }

    /// Files under `dir` that [`reconcile_dir`](Self::reconcile_dir) would process.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DiscoveredFile>> {
        self.discovery.discover(dir)
    }

    /// Reconcile every supported image directly inside `dir`.
    pub async fn reconcile_dir(&self, gallery: &mut Gallery, dir: &Path) -> Result<ReconcileReport> {
        let files = self.discover(dir)?;
        self.reconcile_files(gallery, &files).await
    }

    /// Reconcile the given files as one all-or-nothing batch.
    pub async fn reconcile_files(
        &self,
        gallery: &mut Gallery,
        files: &[DiscoveredFile],
    ) -> Result<ReconcileReport> {
        self.reconcile_files_with(gallery, files, |_| {}).await
    }

    /// Like [`reconcile_files`](Self::reconcile_files), calling `on_image`
    /// after each image is applied (before the batch commits).
    pub async fn reconcile_files_with<F>(
        &self,
        gallery: &mut Gallery,
        files: &[DiscoveredFile],
        mut on_image: F,
    ) -> Result<ReconcileReport>
    where
        F: FnMut(&ImageOutcome),
    {
        let tx = gallery.transaction()?;
        let mut report = ReconcileReport::default();

        for file in files {
            match self.reconcile_one(&tx, file).await {
                Ok(outcome) => {
                    tracing::debug!(
                        "{:?} {}: caption={:?}, tags={:?}",
                        outcome.action,
                        outcome.file_name,
                        outcome.analysis.caption,
                        outcome.analysis.tags
                    );
                    report.record(&outcome);
                    on_image(&outcome);
                }
                Err(e) => {
                    // Dropping `tx` rolls back every write of this batch.
                    tracing::error!(
                        "Reconciliation failed at {:?}: {e}. Rolled back {} image(s).",
                        file.path,
                        report.images
                    );
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        tracing::info!(
            "Reconciled {} image(s): {} created, {} updated, {} new tag(s)",
            report.images,
            report.photos_created,
            report.photos_updated,
            report.tags_created
        );
        Ok(report)
    }

    async fn reconcile_one(&self, tx: &GalleryTx<'_>, file: &DiscoveredFile) -> Result<ImageOutcome> {
        let existing = tx.find_photo_by_filename(&file.file_name)?;

        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| MomentsError::ImageRead {
                path: file.path.clone(),
                source,
            })?;
        let analysis = self.analyzer.analyze(&bytes).await?;

        let mut description_preserved = false;
        let (photo, action) = match existing {
            Some(photo) => {
                if analysis.has_caption() {
                    if self.policy == DescriptionPolicy::Overwrite || photo.has_blank_description()
                    {
                        tx.set_description(photo.id, &analysis.caption)?;
                    } else {
                        tracing::debug!("Keeping existing description for {}", file.file_name);
                        description_preserved = true;
                    }
                }
                // A sentinel tag set carries no data, so the current tags stay.
                if analysis.has_tags() {
                    tx.clear_photo_tags(photo.id)?;
                }
                (photo, PhotoAction::Updated)
            }
            None => {
                let description = analysis
                    .has_caption()
                    .then_some(analysis.caption.as_str());
                let photo = tx.insert_photo(&file.file_name, description)?;
                (photo, PhotoAction::Created)
            }
        };

        let mut tags_created = 0;
        let mut tags_linked = 0;
        for name in analysis.real_tags() {
            let upsert = tx.upsert_tag(name)?;
            if upsert.created {
                tags_created += 1;
            }
            if tx.attach_tag(photo.id, upsert.tag.id)? {
                tags_linked += 1;
            }
        }

        Ok(ImageOutcome {
            file_name: file.file_name.clone(),
            action,
            analysis,
            description_preserved,
            tags_created,
            tags_linked,
        })
    }
}
