//! SQLite-backed gallery of photos and tags.
//!
//! [`Gallery`] owns the connection and serves read queries. All writes go
//! through a [`GalleryTx`], so a batch of changes commits or rolls back as a
//! unit: dropping a `GalleryTx` without calling [`GalleryTx::commit`] discards
//! everything it wrote.

mod models;
pub mod schema;

pub use models::{Photo, Tag, TagUpsert};

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::Result;

/// Photo/tag store over a SQLite connection.
pub struct Gallery {
    conn: Connection,
}

impl Gallery {
    /// Open or create a gallery database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened gallery database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory gallery (for testing and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap a caller-supplied connection, creating the schema if missing.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Start a write transaction.
    pub fn transaction(&mut self) -> Result<GalleryTx<'_>> {
        Ok(GalleryTx {
            tx: self.conn.transaction()?,
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn photo_count(&self) -> Result<u64> {
        count(&self.conn, "photos")
    }

    pub fn tag_count(&self) -> Result<u64> {
        count(&self.conn, "tags")
    }

    /// Number of photo/tag links.
    pub fn photo_tag_count(&self) -> Result<u64> {
        count(&self.conn, "photo_tags")
    }

    pub fn find_photo_by_filename(&self, filename: &str) -> Result<Option<Photo>> {
        find_photo_by_filename(&self.conn, filename)
    }

    pub fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        find_tag_by_name(&self.conn, name)
    }

    /// All photos ordered by filename.
    pub fn list_photos(&self) -> Result<Vec<Photo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM photos ORDER BY filename",
            Photo::COLUMNS
        ))?;
        let photos = stmt
            .query_map([], Photo::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(photos)
    }

    /// Tags linked to a photo, ordered by name.
    pub fn photo_tags(&self, photo_id: i64) -> Result<Vec<Tag>> {
        photo_tags(&self.conn, photo_id)
    }
}

/// A write transaction over the gallery.
pub struct GalleryTx<'a> {
    tx: Transaction<'a>,
}

impl GalleryTx<'_> {
    pub fn find_photo_by_filename(&self, filename: &str) -> Result<Option<Photo>> {
        find_photo_by_filename(&self.tx, filename)
    }

    /// Insert a new photo. Rendition filenames default to `filename`.
    pub fn insert_photo(&self, filename: &str, description: Option<&str>) -> Result<Photo> {
        self.tx.execute(
            "INSERT INTO photos (filename, filename_s, filename_m, description, author_id)
             VALUES (?1, ?1, ?1, ?2, NULL)",
            params![filename, description],
        )?;
        let id = self.tx.last_insert_rowid();
        let photo = self.tx.query_row(
            &format!("SELECT {} FROM photos WHERE id = ?1", Photo::COLUMNS),
            params![id],
            Photo::from_row,
        )?;
        Ok(photo)
    }

    pub fn set_description(&self, photo_id: i64, description: &str) -> Result<()> {
        self.tx.execute(
            "UPDATE photos SET description = ?1 WHERE id = ?2",
            params![description, photo_id],
        )?;
        Ok(())
    }

    /// Remove every tag link of a photo. Tags themselves are kept.
    pub fn clear_photo_tags(&self, photo_id: i64) -> Result<usize> {
        let removed = self
            .tx
            .execute("DELETE FROM photo_tags WHERE photo_id = ?1", params![photo_id])?;
        Ok(removed)
    }

    pub fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        find_tag_by_name(&self.tx, name)
    }

    /// Return the tag named `name`, creating it if it doesn't exist yet.
    ///
    /// Idempotent: calling twice with the same name yields the same row, and
    /// only the first call reports `created`. The row is visible to later
    /// lookups in this transaction immediately.
    pub fn upsert_tag(&self, name: &str) -> Result<TagUpsert> {
        let inserted = self.tx.execute(
            "INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        let tag = self.tx.query_row(
            "SELECT id, name FROM tags WHERE name = ?1",
            params![name],
            Tag::from_row,
        )?;
        Ok(TagUpsert {
            tag,
            created: inserted == 1,
        })
    }

    /// Link a tag to a photo. Returns false if the link already existed.
    pub fn attach_tag(&self, photo_id: i64, tag_id: i64) -> Result<bool> {
        let inserted = self.tx.execute(
            "INSERT OR IGNORE INTO photo_tags (photo_id, tag_id) VALUES (?1, ?2)",
            params![photo_id, tag_id],
        )?;
        Ok(inserted == 1)
    }

    pub fn photo_tags(&self, photo_id: i64) -> Result<Vec<Tag>> {
        photo_tags(&self.tx, photo_id)
    }

    /// Persist every change made through this transaction.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

// Shared by `Gallery` and `GalleryTx` (a `Transaction` derefs to `Connection`).

fn count(conn: &Connection, table: &str) -> Result<u64> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(n as u64)
}

fn find_photo_by_filename(conn: &Connection, filename: &str) -> Result<Option<Photo>> {
    let photo = conn
        .query_row(
            &format!("SELECT {} FROM photos WHERE filename = ?1", Photo::COLUMNS),
            params![filename],
            Photo::from_row,
        )
        .optional()?;
    Ok(photo)
}

fn find_tag_by_name(conn: &Connection, name: &str) -> Result<Option<Tag>> {
    let tag = conn
        .query_row(
            "SELECT id, name FROM tags WHERE name = ?1",
            params![name],
            Tag::from_row,
        )
        .optional()?;
    Ok(tag)
}

fn photo_tags(conn: &Connection, photo_id: i64) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name FROM tags t
         JOIN photo_tags pt ON pt.tag_id = t.id
         WHERE pt.photo_id = ?1
         ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map(params![photo_id], Tag::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}
