// Cache path utilities.
// Maps a request fingerprint onto a two-level hashed directory layout.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "fetch-cache";

/// Filesystem locations for one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPaths {
    /// Bucket directory holding the entry (`<root>/ab/cd`).
    pub container: PathBuf,
    /// Raw response body.
    pub data: PathBuf,
    /// Sibling file holding the pre-hash cache key.
    pub metadata: PathBuf,
}

/// Hex digest of a cache key.
pub fn key_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Paths for the entry stored under `key`.
///
/// The first four hex characters of the digest pick the bucket, so no
/// directory ever holds more than 256 children.
pub fn entry_paths(root: &Path, key: &str) -> EntryPaths {
    let digest = key_digest(key);
    let container = root.join(&digest[0..2]).join(&digest[2..4]);
    let data = container.join(&digest);
    let metadata = container.join(format!("{}.txt", digest));
    EntryPaths {
        container,
        data,
        metadata,
    }
}

/// Temporary sibling used while a file is being written.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("~");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_paths_layout() {
        let root = Path::new("fetch-cache");
        let key = "GET https://example.edu/prod/bwckschd.p_disp_dyn_sched  ";
        let digest = key_digest(key);
        let paths = entry_paths(root, key);

        assert_eq!(digest.len(), 64);
        assert_eq!(
            paths.container,
            root.join(&digest[0..2]).join(&digest[2..4])
        );
        assert_eq!(paths.data, paths.container.join(&digest));
        assert!(paths.metadata.to_string_lossy().ends_with(".txt"));
        assert_eq!(paths.metadata.parent(), Some(paths.container.as_path()));
    }

    #[test]
    fn test_entry_paths_deterministic() {
        let root = Path::new("/tmp/cache");
        assert_eq!(entry_paths(root, "GET a  "), entry_paths(root, "GET a  "));
        assert_ne!(
            entry_paths(root, "GET a  ").data,
            entry_paths(root, "POST a  ").data
        );
    }

    #[test]
    fn test_temp_path() {
        let path = Path::new("out/202402.json");
        assert_eq!(temp_path(path), PathBuf::from("out/202402.json~"));
    }
}
