// JSON output files.
// Each record set is written compact and pretty, both atomically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::write_text;
use crate::error::Result;

/// Write `<stem>.json` and `<stem>-pretty.json` under `dir`.
///
/// Returns the compact file's path.
pub fn write_json_pair<T: Serialize + ?Sized>(dir: &Path, stem: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let compact_path = dir.join(format!("{}.json", stem));
    let pretty_path = dir.join(format!("{}-pretty.json", stem));

    write_text(&compact_path, &serde_json::to_string(value)?)?;
    write_text(&pretty_path, &serde_json::to_string_pretty(value)?)?;

    Ok(compact_path)
}
