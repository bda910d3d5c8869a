//! Photo storage and gallery selection
//!
//! [`PhotoStore`] owns the photo directory: timestamp-based filenames,
//! name-sorted listing (timestamps sort chronologically), and deletion.
//! [`GallerySelection`] is the mode-local cursor over one listing; it is
//! rebuilt fresh every time Gallery mode is entered, never cached across
//! visits.

use crate::error::{CamdeckError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Photo directory operations
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    /// Create a store over `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The photo directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List image files sorted ascending by name (oldest first)
    pub fn list_images(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"))
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Delete one photo
    pub fn delete(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)
            .map_err(|e| CamdeckError::PhotoStorage(Box::new(e)))?;
        info!("Deleted {}", path.display());
        Ok(())
    }

    /// Generate a timestamp-based filename, `IMG_YYYYMMDD_HHMMSS.jpg`
    pub fn new_timestamped_filename(&self) -> String {
        chrono::Local::now().format("IMG_%Y%m%d_%H%M%S.jpg").to_string()
    }

    /// Full path for the next still capture
    pub fn new_still_path(&self) -> PathBuf {
        self.dir.join(self.new_timestamped_filename())
    }
}

/// Cursor over one gallery listing
///
/// Invariant: `index < paths.len()` whenever `paths` is non-empty. The
/// selection only exists while non-empty; deleting the last photo dissolves
/// it (and Gallery mode with it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySelection {
    paths: Vec<PathBuf>,
    index: usize,
}

impl GallerySelection {
    /// Build a selection over `paths`, selecting the last (most recent)
    ///
    /// Returns `None` for an empty listing: Gallery mode is unreachable
    /// without photos.
    pub fn new(paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            return None;
        }
        let index = paths.len() - 1;
        Some(Self { paths, index })
    }

    /// Currently selected photo
    pub fn current(&self) -> &Path {
        &self.paths[self.index]
    }

    /// Number of photos in the listing
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false while the selection exists
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Zero-based cursor position
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the previous photo, clamped at the start (no wraparound)
    pub fn select_previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Move to the next photo, clamped at the end (no wraparound)
    pub fn select_next(&mut self) {
        self.index = (self.index + 1).min(self.paths.len() - 1);
    }

    /// Remove `path` from the listing, clamping the cursor
    ///
    /// Returns the surviving selection, or `None` when the listing is now
    /// empty.
    pub fn without(mut self, path: &Path) -> Option<Self> {
        self.paths.retain(|p| p != path);
        if self.paths.is_empty() {
            return None;
        }
        self.index = self.index.min(self.paths.len() - 1);
        Some(self)
    }

    /// Position overlay text, `"3/7"` style (one-based)
    pub fn position_text(&self) -> String {
        format!("{}/{}", self.index + 1, self.paths.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"jpeg").unwrap();
        path
    }

    #[test]
    fn list_images_is_name_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path()).unwrap();
        touch(dir.path(), "IMG_20250103_120000.jpg");
        touch(dir.path(), "IMG_20250101_120000.jpg");
        touch(dir.path(), "IMG_20250102_120000.jpg");
        touch(dir.path(), "notes.txt"); // ignored

        let images = store.list_images().unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "IMG_20250101_120000.jpg",
                "IMG_20250102_120000.jpg",
                "IMG_20250103_120000.jpg"
            ]
        );
    }

    #[test]
    fn timestamped_filename_matches_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path()).unwrap();
        let name = store.new_timestamped_filename();

        // IMG_YYYYMMDD_HHMMSS.jpg
        assert_eq!(name.len(), 23);
        assert!(name.starts_with("IMG_"));
        assert!(name.ends_with(".jpg"));
        assert!(name[4..12].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&name[12..13], "_");
        assert!(name[13..19].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path()).unwrap();
        let path = touch(dir.path(), "IMG_20250101_120000.jpg");

        store.delete(&path).unwrap();
        assert!(!path.exists());
        assert!(store.list_images().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path()).unwrap();
        let result = store.delete(&dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(CamdeckError::PhotoStorage(_))));
    }

    #[test]
    fn selection_starts_at_most_recent() {
        let paths = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];
        let selection = GallerySelection::new(paths).unwrap();
        assert_eq!(selection.index(), 1);
        assert_eq!(selection.current(), Path::new("b.jpg"));
    }

    #[test]
    fn empty_listing_yields_no_selection() {
        assert!(GallerySelection::new(Vec::new()).is_none());
    }

    #[test]
    fn navigation_clamps_without_wraparound() {
        let paths: Vec<PathBuf> = (0..3).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let mut selection = GallerySelection::new(paths).unwrap();

        for _ in 0..8 {
            selection.select_next();
        }
        assert_eq!(selection.index(), 2);

        for _ in 0..8 {
            selection.select_previous();
        }
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn without_clamps_index() {
        let paths: Vec<PathBuf> = (0..3).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let mut selection = GallerySelection::new(paths).unwrap();
        assert_eq!(selection.index(), 2);

        let removed = selection.current().to_path_buf();
        selection = selection.without(&removed).unwrap();
        assert_eq!(selection.index(), 1);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn without_last_photo_dissolves_selection() {
        let selection = GallerySelection::new(vec![PathBuf::from("only.jpg")]).unwrap();
        assert!(selection.without(Path::new("only.jpg")).is_none());
    }

    #[test]
    fn position_text_is_one_based() {
        let paths: Vec<PathBuf> = (0..7).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let selection = GallerySelection::new(paths).unwrap();
        assert_eq!(selection.position_text(), "7/7");
    }
}
