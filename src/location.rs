//! Source location shortening.

use crate::record::SourceLocation;
use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Marker of Cargo's package cache: `~/.cargo/registry/src/<index-dir>/`.
const REGISTRY_MARKER: &str = "registry/src/";

/// Find the module root: the nearest directory, starting at the working
/// directory and walking upward, that contains a `Cargo.toml`.
///
/// Returns `None` when the filesystem root is reached without a match or the
/// working directory cannot be read.
#[must_use]
pub fn module_root() -> Option<PathBuf> {
    let cwd = env::current_dir().ok()?;
    find_root_from(&cwd)
}

/// Walk upward from `start` looking for a directory containing `Cargo.toml`.
#[must_use]
pub fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("Cargo.toml").is_file())
        .map(Path::to_path_buf)
}

/// Turn a module root into the prefix stripped from file paths.
#[must_use]
pub fn root_prefix(root: Option<&Path>) -> String {
    match root {
        Some(root) => {
            let mut prefix = root.to_string_lossy().into_owned();
            if !prefix.ends_with(MAIN_SEPARATOR) {
                prefix.push(MAIN_SEPARATOR);
            }
            prefix
        }
        None => String::new(),
    }
}

/// Render a location as `path:line`.
///
/// The module prefix is removed from the front of the path, and paths into
/// Cargo's package cache are cut down to `<crate>-<version>/file:line`. A
/// missing location renders as `:0`.
#[must_use]
pub fn format_location(location: Option<&SourceLocation>, module_prefix: &str) -> String {
    let (file, line) = match location {
        Some(loc) => (loc.file.as_ref(), loc.line),
        None => ("", 0),
    };
    let file = if module_prefix.is_empty() {
        file
    } else {
        file.strip_prefix(module_prefix).unwrap_or(file)
    };
    let loc = format!("{file}:{line}");

    match loc.find(REGISTRY_MARKER) {
        Some(i) => {
            let rest = &loc[i + REGISTRY_MARKER.len()..];
            match rest.find('/') {
                Some(j) => rest[j + 1..].to_string(),
                None => rest.to_string(),
            }
        }
        None => loc,
    }
}
