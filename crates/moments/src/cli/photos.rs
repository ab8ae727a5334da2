//! The `moments photos` command for inspecting the gallery.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use moments_core::{Config, Gallery, Photo};
use serde::Serialize;

/// Arguments for the `photos` command.
#[derive(Args, Debug)]
pub struct PhotosArgs {
    /// Gallery database file (defaults to `gallery.database` from config)
    #[arg(short, long, global = true, env = "MOMENTS_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PhotosCommand,
}

/// Subcommands for gallery inspection.
#[derive(Subcommand, Debug)]
pub enum PhotosCommand {
    /// List photos with their descriptions and tags
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show row counts
    Stats,
}

#[derive(Debug, Serialize)]
struct PhotoListing {
    #[serde(flatten)]
    photo: Photo,
    tags: Vec<String>,
}

fn load_listings(gallery: &Gallery) -> moments_core::Result<Vec<PhotoListing>> {
    gallery
        .list_photos()?
        .into_iter()
        .map(|photo| {
            let tags = gallery
                .photo_tags(photo.id)?
                .into_iter()
                .map(|t| t.name)
                .collect();
            Ok(PhotoListing { photo, tags })
        })
        .collect()
}

/// Execute the photos command.
pub async fn execute(args: PhotosArgs, config: Config) -> anyhow::Result<()> {
    let db_path = args.database.unwrap_or_else(|| config.database_path());
    if !db_path.exists() {
        anyhow::bail!(
            "No gallery database at {}\n\n  Hint: Run `moments sync <DIR>` first.",
            db_path.display()
        );
    }
    let gallery = Gallery::open(&db_path)?;

    match args.command {
        PhotosCommand::List { json } => {
            let listings = load_listings(&gallery)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listings)?);
            } else {
                for listing in &listings {
                    println!(
                        "{}\t{}\t{}",
                        listing.photo.filename,
                        listing.photo.description.as_deref().unwrap_or("-"),
                        listing.tags.join(", ")
                    );
                }
            }
        }

        PhotosCommand::Stats => {
            println!("photos:     {}", gallery.photo_count()?);
            println!("tags:       {}", gallery.tag_count()?);
            println!("photo_tags: {}", gallery.photo_tag_count()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_include_tags() {
        let mut gallery = Gallery::open_in_memory().unwrap();
        let tx = gallery.transaction().unwrap();
        let photo = tx.insert_photo("a.jpg", Some("a red barn")).unwrap();
        for name in ["farm", "barn"] {
            let tag = tx.upsert_tag(name).unwrap().tag;
            tx.attach_tag(photo.id, tag.id).unwrap();
        }
        tx.insert_photo("b.jpg", None).unwrap();
        tx.commit().unwrap();

        let listings = load_listings(&gallery).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].tags, vec!["barn", "farm"]);
        assert!(listings[1].tags.is_empty());

        let json = serde_json::to_value(&listings[0]).unwrap();
        assert_eq!(json["filename"], "a.jpg");
        assert_eq!(json["description"], "a red barn");
    }

    #[tokio::test]
    async fn missing_database_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let args = PhotosArgs {
            database: Some(dir.path().join("missing.db")),
            command: PhotosCommand::Stats,
        };
        let err = execute(args, Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("No gallery database"));
    }
}
