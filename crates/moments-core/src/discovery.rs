//! File discovery for finding images in a gallery directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::GalleryConfig;
use crate::error::{MomentsError, Result};

/// Lists supported image files directly inside a directory.
pub struct FileDiscovery {
    supported_formats: Vec<String>,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name, the key photos are matched on
    pub file_name: String,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            supported_formats: config
                .supported_formats
                .iter()
                .map(|f| f.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Discover supported image files at a path.
    ///
    /// If path is a file, returns it if supported. If path is a directory,
    /// returns its supported files without descending into subdirectories.
    /// A path that cannot be listed is an error, not an empty result.
    pub fn discover(&self, path: &Path) -> Result<Vec<DiscoveredFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .min_depth(if path.is_dir() { 1 } else { 0 })
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|source| MomentsError::Discovery {
                path: path.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || !self.is_supported(entry.path()) {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping {:?}: file name is not valid UTF-8", entry.path());
                continue;
            };
            let size = entry
                .metadata()
                .map_err(|source| MomentsError::Discovery {
                    path: entry.path().to_path_buf(),
                    source,
                })?
                .len();

            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                file_name: file_name.to_string(),
                size,
            });
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.supported_formats.iter().any(|fmt| *fmt == ext_lower)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(&GalleryConfig::default())
    }

    #[test]
    fn test_is_supported() {
        let discovery = discovery();
        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(!discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("jpg")));
    }

    #[test]
    fn test_discover_directory_is_flat_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"png").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"jpeg").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.jpg"), b"jpeg").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(files[0].size, 4);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpeg");
        std::fs::write(&path, b"jpeg").unwrap();

        let files = discovery().discover(&path).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "photo.jpeg");
    }

    #[test]
    fn test_custom_formats_accept_leading_dot() {
        let config = GalleryConfig {
            supported_formats: vec![".WEBP".to_string()],
            ..GalleryConfig::default()
        };
        let discovery = FileDiscovery::new(&config);
        assert!(discovery.is_supported(Path::new("x.webp")));
        assert!(!discovery.is_supported(Path::new("x.jpg")));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let err = discovery()
            .discover(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, MomentsError::Discovery { .. }));
        assert!(err.to_string().contains("/definitely/not/here"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_name_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let bad = OsStr::from_bytes(b"caf\xe9.jpg");
        // Some filesystems reject non-UTF-8 names outright
        if std::fs::write(dir.path().join(bad), b"jpeg").is_err() {
            return;
        }
        std::fs::write(dir.path().join("ok.jpg"), b"jpeg").unwrap();

        let files = discovery().discover(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["ok.jpg"]);
    }
}
