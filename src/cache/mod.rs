// Cache module for local filesystem caching.
// Stores raw portal responses so reruns replay without network access.

pub mod paths;
pub mod store;

pub use paths::{DEFAULT_CACHE_DIR, EntryPaths, entry_paths, key_digest};
pub use store::{CacheStore, read_text, write_text};
