//! Module path resolution for local relative import specifiers.
//!
//! Mirrors conventional module-resolution shorthand (extensionless imports,
//! directory index files) without being a general resolver: one source
//! extension, no package-manifest lookups, no search paths.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use docgen_shared::{DocgenError, Result};

/// Whether a specifier names a local module (relative path) rather than a package.
pub fn is_local_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Resolve a relative specifier against the file that imports it.
///
/// Candidates are tried in order:
/// 1. the joined path as-is, when it already carries the source extension
///    (no existence check);
/// 2. `<joined>.<ext>`;
/// 3. `<joined>/index.<ext>`.
///
/// Neither candidate existing is unrecoverable: the error names both the
/// base file and the unresolved specifier.
pub fn resolve_relative(base: &Path, specifier: &str, source_ext: &str) -> Result<PathBuf> {
    let dir = base.parent().unwrap_or_else(|| Path::new(""));
    let target = dir.join(specifier);

    if target.extension().and_then(|e| e.to_str()) == Some(source_ext) {
        return Ok(target);
    }

    // Append, not replace: './pkg.config' must try 'pkg.config.js'.
    let mut with_ext = OsString::from(target.as_os_str());
    with_ext.push(".");
    with_ext.push(source_ext);
    let candidate = PathBuf::from(with_ext);
    if candidate.is_file() {
        return Ok(candidate);
    }

    let index = target.join(format!("index.{source_ext}"));
    if index.is_file() {
        return Ok(index);
    }

    Err(DocgenError::UnresolvedImport {
        base: base.to_path_buf(),
        specifier: specifier.to_string(),
    })
}
