//! Static project analysis predicates.
//!
//! The engine inspects the project's file list (never file contents) to
//! derive traits that condition generated source text.

use std::path::{Path, PathBuf};

use crate::consts::COMPONENTS_DIR_PREFIX;

/// A reference to a project file, only ever path-compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFileRef {
  /// Directory containing the file.
  pub directory: PathBuf,

  /// File name within `directory`.
  pub base_name: String,
}

impl ProjectFileRef {
  pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
    Self {
      directory: directory.into(),
      base_name: base_name.into(),
    }
  }

  /// Split a full path into directory and base name.
  pub fn from_path(path: &Path) -> Self {
    Self {
      directory: path.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
      base_name: path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default(),
    }
  }

  fn full_path(&self) -> PathBuf {
    self.directory.join(&self.base_name)
  }
}

/// Returns true if any file sits at or under `src/components`.
///
/// The check is a string-prefix test on the root-relative path, so a file
/// literally named `src/components` also counts. Order-independent,
/// short-circuits on the first match; files outside the project root
/// never match.
pub fn has_components_dir(project_root: &Path, files: &[ProjectFileRef]) -> bool {
  files.iter().any(|file| {
    let full = file.full_path();
    match full.strip_prefix(project_root) {
      Ok(relative) => relative
        .to_string_lossy()
        .replace('\\', "/")
        .starts_with(COMPONENTS_DIR_PREFIX),
      Err(_) => false,
    }
  })
}
