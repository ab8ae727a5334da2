//! The `moments sync` command: reconcile a directory into the gallery.

use std::path::{Path, PathBuf};

use clap::Args;
use moments_core::{
    AzureVisionClient, Config, DescriptionPolicy, Gallery, ReconcileReport, Reconciler,
};

/// Arguments for the `sync` command.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory containing the images to reconcile
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Gallery database file (defaults to `gallery.database` from config)
    #[arg(short, long, env = "MOMENTS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Always replace existing descriptions with the new caption
    #[arg(long)]
    pub overwrite_descriptions: bool,
}

/// Apply CLI overrides on top of the loaded config.
fn apply_overrides(args: &SyncArgs, config: &mut Config) {
    if args.overwrite_descriptions {
        config.gallery.description_policy = DescriptionPolicy::Overwrite;
    }
    if let Some(ref database) = args.database {
        config.gallery.database = database.clone();
    }
}

/// Execute the sync command.
///
/// A failed batch is reported and rolled back; it does not fail the process.
pub async fn execute(args: SyncArgs, mut config: Config) -> anyhow::Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!(
            "Not a directory: {:?}\n\n  Hint: `moments sync` takes a folder of images.",
            args.dir
        );
    }

    apply_overrides(&args, &mut config);

    let client = AzureVisionClient::new(&config.vision)?;
    let db_path = config.database_path();
    let mut gallery = Gallery::open(&db_path)?;
    let reconciler = Reconciler::from_config(Box::new(client), &config.gallery);

    let files = reconciler.discover(&args.dir)?;
    if files.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.dir);
        return Ok(());
    }
    tracing::info!(
        "Found {} image(s) to reconcile (description policy: {})",
        files.len(),
        reconciler.policy()
    );

    let progress = create_progress_bar(files.len() as u64);
    let start_time = std::time::Instant::now();

    let result = reconciler
        .reconcile_files_with(&mut gallery, &files, |outcome| {
            progress.set_message(outcome.file_name.clone());
            progress.inc(1);
        })
        .await;

    progress.finish_and_clear();

    match result {
        Ok(report) => print_summary(&report, &db_path, start_time.elapsed()),
        Err(e) => {
            tracing::error!("Sync aborted, no changes were saved: {e}");
        }
    }

    Ok(())
}

/// Create a progress bar for the reconciliation batch.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a committed batch.
fn print_summary(report: &ReconcileReport, db_path: &Path, elapsed: std::time::Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Photos created:  {:>8}", report.photos_created);
    eprintln!("    Photos updated:  {:>8}", report.photos_updated);
    eprintln!("    Tags created:    {:>8}", report.tags_created);
    if report.descriptions_preserved > 0 {
        eprintln!("    Kept captions:   {:>8}", report.descriptions_preserved);
    }
    if report.no_data > 0 {
        eprintln!("    No API data:     {:>8}", report.no_data);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Images:          {:>8}", report.images);
    eprintln!("    Duration:        {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
    eprintln!("  Saved to {}", db_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(overwrite: bool, database: Option<&str>) -> SyncArgs {
        SyncArgs {
            dir: PathBuf::from("./photos"),
            database: database.map(PathBuf::from),
            overwrite_descriptions: overwrite,
        }
    }

    #[test]
    fn overrides_leave_config_alone_by_default() {
        let mut config = Config::default();
        apply_overrides(&args(false, None), &mut config);
        assert_eq!(
            config.gallery.description_policy,
            DescriptionPolicy::Preserve
        );
        assert_eq!(
            config.gallery.database,
            Config::default().gallery.database
        );
    }

    #[test]
    fn overwrite_flag_switches_policy() {
        let mut config = Config::default();
        apply_overrides(&args(true, None), &mut config);
        assert_eq!(
            config.gallery.description_policy,
            DescriptionPolicy::Overwrite
        );
    }

    #[test]
    fn database_flag_overrides_config() {
        let mut config = Config::default();
        apply_overrides(&args(false, Some("/tmp/gallery.db")), &mut config);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/gallery.db"));
    }

    #[tokio::test]
    async fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let sync_args = SyncArgs {
            dir: dir.path().join("nope"),
            database: None,
            overwrite_descriptions: false,
        };
        let err = execute(sync_args, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }
}
