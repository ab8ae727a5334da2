//! Row types for the gallery tables.

use rusqlite::Row;
use serde::Serialize;

/// A stored photo, matched to image files by `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub id: i64,
    pub filename: String,
    /// Small rendition filename
    pub filename_s: String,
    /// Medium rendition filename
    pub filename_m: String,
    pub description: Option<String>,
    pub author_id: Option<i64>,
    pub created_at: String,
}

impl Photo {
    pub(crate) const COLUMNS: &'static str =
        "id, filename, filename_s, filename_m, description, author_id, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            filename: row.get(1)?,
            filename_s: row.get(2)?,
            filename_m: row.get(3)?,
            description: row.get(4)?,
            author_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    /// Whether the description is missing or whitespace only.
    pub fn has_blank_description(&self) -> bool {
        self.description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
    }
}

/// A tag, unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Result of [`GalleryTx::upsert_tag`](super::GalleryTx::upsert_tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUpsert {
    /// The existing or newly created row
    pub tag: Tag,
    /// True when this call inserted the row
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(description: Option<&str>) -> Photo {
        Photo {
            id: 1,
            filename: "a.jpg".to_string(),
            filename_s: "a.jpg".to_string(),
            filename_m: "a.jpg".to_string(),
            description: description.map(String::from),
            author_id: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_blank_description() {
        assert!(photo(None).has_blank_description());
        assert!(photo(Some("")).has_blank_description());
        assert!(photo(Some("  \t")).has_blank_description());
        assert!(!photo(Some("my cat")).has_blank_description());
    }
}
