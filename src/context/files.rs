//! Directory listing for the prompt context.

use std::fs;
use std::io;
use std::path::Path;

/// List up to `max` non-hidden entry names in `dir`, sorted by name.
pub fn visible_entries(dir: &Path, max: usize) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| !name.trim().is_empty() && !name.starts_with('.'))
        .collect();

    names.sort();
    names.truncate(max);
    Ok(names)
}
