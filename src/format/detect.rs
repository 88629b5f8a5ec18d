//! File-name based format detection.
//!
//! Drivers declare the files they handle as glob patterns such as
//! `"*.svs;*.tif"`. Detection only looks at the file name; container
//! contents are checked by the driver when it opens the file.

use std::path::Path;

use wildmatch::WildMatch;

/// Whether the file name of `path` matches any `;`-separated glob in
/// `pattern`, ignoring case.
///
/// Empty alternatives are ignored, so `"*.png;;"` behaves like `"*.png"`.
pub fn match_pattern(path: &str, pattern: &str) -> bool {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_lowercase();

    pattern
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .any(|part| WildMatch::new(&part.to_lowercase()).matches(&file_name))
}
