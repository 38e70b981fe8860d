//! Generated source file writing

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::error::GenResult;

const HEADER: &str = "// @generated by proto_guard_gen. DO NOT EDIT.\n";

/// Prefix `source` with the generated-code header.
pub fn with_header(source: &str) -> String {
    let mut output = String::with_capacity(HEADER.len() + source.len() + 1);
    output.push_str(HEADER);
    output.push_str(source);
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Write `source` to `dir/file` unless the file already holds it.
///
/// Returns the path and whether the file was written, so build scripts
/// do not retrigger compilation for unchanged output.
pub fn write_if_changed(dir: impl AsRef<Path>, file: &str, source: &str) -> GenResult<(PathBuf, bool)> {
    let path = dir.as_ref().join(file);
    let content = with_header(source);

    if fs::read_to_string(&path).is_ok_and(|existing| existing == content) {
        tracing::debug!(path = %path.display(), "generated source unchanged");
        return Ok((path, false));
    }

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    tracing::info!(path = %path.display(), "wrote generated source");
    Ok((path, true))
}
