// Cache store for reading and writing raw response bodies.
// Entries are content-addressed by request fingerprint and written atomically.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::paths::{EntryPaths, entry_paths, temp_path};

/// Flat on-disk cache of response bodies keyed by request fingerprint.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`. Nothing is touched on disk until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Paths for the entry stored under `key`.
    pub fn paths(&self, key: &str) -> EntryPaths {
        entry_paths(&self.root, key)
    }

    /// Load the cached body for `key`, or `None` on a miss.
    ///
    /// Only the data file counts: a metadata file without data is a miss.
    pub fn load(&self, key: &str) -> Result<Option<String>> {
        read_text(&self.paths(key).data)
    }

    /// Save `text` under `key`. Metadata is committed before data.
    pub fn save(&self, key: &str, text: &str) -> Result<()> {
        let paths = self.paths(key);
        fs::create_dir_all(&paths.container)?;
        write_text(&paths.metadata, key)?;
        write_text(&paths.data, text)?;
        Ok(())
    }
}

/// Write text to a temporary sibling (`<path>~`) without committing it.
pub(crate) fn write_temp(path: &Path, text: &str) -> Result<PathBuf> {
    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    Ok(temp_path)
}

/// Write text atomically via temp file and rename.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let temp_path = write_temp(path, text)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read text from a file, returning `None` if it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("fetch-cache"));
        let key = "GET https://example.edu/prod/page  ";

        assert_eq!(store.load(key).unwrap(), None);

        store.save(key, "<html>body</html>").unwrap();

        assert_eq!(
            store.load(key).unwrap(),
            Some("<html>body</html>".to_string())
        );
    }

    #[test]
    fn test_metadata_holds_original_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = "POST https://example.edu/x {\"content-type\":\"text/plain\"} a=1";

        store.save(key, "data").unwrap();

        let metadata = fs::read_to_string(store.paths(key).metadata).unwrap();
        assert_eq!(metadata, key);
    }

    #[test]
    fn test_metadata_without_data_is_miss() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = "GET https://example.edu/half  ";
        let paths = store.paths(key);

        fs::create_dir_all(&paths.container).unwrap();
        write_text(&paths.metadata, key).unwrap();

        assert_eq!(store.load(key).unwrap(), None);
    }

    #[test]
    fn test_interrupted_write_leaves_target_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = "GET https://example.edu/crash  ";
        let paths = store.paths(key);
        fs::create_dir_all(&paths.container).unwrap();

        // Crash after the temp write, before the rename.
        let temp = write_temp(&paths.data, "partial").unwrap();

        assert!(temp.exists());
        assert!(!paths.data.exists());
        assert_eq!(store.load(key).unwrap(), None);
    }

    #[test]
    fn test_save_replaces_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let key = "GET https://example.edu/terms  ";

        store.save(key, "old").unwrap();
        store.save(key, "new").unwrap();

        assert_eq!(store.load(key).unwrap(), Some("new".to_string()));
        assert!(!temp_path(&store.paths(key).data).exists());
    }

    #[test]
    fn test_ensure_root_is_lazy() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("cache");
        let store = CacheStore::new(&root);

        assert!(!root.exists());
        store.ensure_root().unwrap();
        assert!(root.is_dir());
        store.ensure_root().unwrap();
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent");

        assert!(read_text(&path).unwrap().is_none());
    }
}
