//! Ensure managed project files exist with the required content.
//!
//! This module provides the core logic for the ensure pass, which
//! guarantees three managed files in the target project:
//! - `src/index.tsx` component entry, generated only if absent
//! - `tests/index.ts` test stub, skipped entirely once it exists
//! - `package.json`, deep-merged with the enforced field overlay
//!
//! Files are processed independently in a fixed order; a failure on one
//! file does not prevent the others from being attempted.

mod templates;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::consts::{COMPONENT_ENTRY_PATH, PACKAGE_JSON_PATH, TEST_STUB_PATH, TOOL_PACKAGE_NAME};
use crate::context::ProjectContext;
use crate::manifest::{self, ManifestError};
use crate::services::{FileSystem, FormatError, Parser, SourceFormatter};

pub use templates::{COMPONENT_ENTRY_TEMPLATE, TEST_STUB_TEMPLATE};

/// Errors that can occur while ensuring a single managed file.
#[derive(Debug, Error)]
pub enum EnsureError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to format generated content for {}: {source}", path.display())]
  Format {
    path: PathBuf,
    #[source]
    source: FormatError,
  },

  #[error(transparent)]
  Manifest(#[from] ManifestError),
}

/// What happened to a single managed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
  /// File did not exist and was written.
  Created,

  /// File existed and its content was rewritten.
  Updated,

  /// File existed and already had the required content.
  Unchanged,

  /// File existed and the ensure step was skipped without inspection.
  Skipped,
}

/// Per-file result of an ensure pass.
#[derive(Debug)]
pub struct FileResult {
  /// Path of the managed file, relative to the project root.
  pub relative_path: PathBuf,

  /// Outcome, or the error that stopped this file's ensure step.
  pub outcome: Result<FileOutcome, EnsureError>,
}

/// Aggregate result of an ensure pass.
#[derive(Debug, Default)]
pub struct EnsureReport {
  /// Per-file results, in processing order.
  pub files: Vec<FileResult>,
}

impl EnsureReport {
  /// True if every file succeeded or was a defined no-op.
  pub fn is_success(&self) -> bool {
    self.files.iter().all(|file| file.outcome.is_ok())
  }

  /// Files whose ensure step failed.
  pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
    self.files.iter().filter(|file| file.outcome.is_err())
  }

  fn record(&mut self, relative_path: impl Into<PathBuf>, outcome: Result<FileOutcome, EnsureError>) {
    let relative_path = relative_path.into();
    match &outcome {
      Ok(result) => info!(file = %relative_path.display(), outcome = ?result, "ensure step finished"),
      Err(e) => error!(file = %relative_path.display(), error = %e, "ensure step failed"),
    }
    self.files.push(FileResult { relative_path, outcome });
  }
}

/// A file whose content this engine is responsible for.
///
/// Identity is the relative path; at most one record governs a given path
/// per ensure pass. Records are constructed fresh on every pass and
/// consumed once.
pub struct ManagedFile<'a> {
  relative_path: PathBuf,
  pipe: Box<dyn Fn(Option<&str>) -> Result<String, EnsureError> + 'a>,
}

impl<'a> ManagedFile<'a> {
  pub fn new(
    relative_path: impl Into<PathBuf>,
    pipe: impl Fn(Option<&str>) -> Result<String, EnsureError> + 'a,
  ) -> Self {
    Self {
      relative_path: relative_path.into(),
      pipe: Box::new(pipe),
    }
  }

  pub fn relative_path(&self) -> &Path {
    &self.relative_path
  }
}

/// Ensure all managed project files.
///
/// Processes, in order: `package.json`, `src/index.tsx`, `tests/index.ts`.
/// The returned report carries one result per file; check
/// [`EnsureReport::is_success`] for the aggregate verdict.
pub fn ensure_project_files(
  ctx: &ProjectContext,
  fs: &dyn FileSystem,
  formatter: &dyn SourceFormatter,
) -> EnsureReport {
  info!(root = %ctx.root.display(), "ensuring project files");

  let mut report = EnsureReport::default();

  let package_json = package_json_file(ctx);
  report.record(PACKAGE_JSON_PATH, ensure_file(fs, &ctx.root, &package_json));

  let entry = component_entry_file(formatter);
  report.record(COMPONENT_ENTRY_PATH, ensure_file(fs, &ctx.root, &entry));

  report.record(TEST_STUB_PATH, ensure_test_stub(ctx, fs, formatter));

  report
}

/// Ensure a single managed file.
///
/// Reads existing content if present, runs the pipe, and writes only if
/// the result differs from what is on disk. Empty existing content counts
/// as absent for the pipe.
pub fn ensure_file(
  fs: &dyn FileSystem,
  project_root: &Path,
  file: &ManagedFile<'_>,
) -> Result<FileOutcome, EnsureError> {
  let path = project_root.join(&file.relative_path);

  let existing = fs.read_text(&path).map_err(|source| EnsureError::Read {
    path: path.clone(),
    source,
  })?;
  let prior = existing.as_deref().filter(|text| !text.is_empty());

  let content = (file.pipe)(prior)?;
  if existing.as_deref() == Some(content.as_str()) {
    return Ok(FileOutcome::Unchanged);
  }

  fs.write_text(&path, &content)
    .map_err(|source| EnsureError::Write { path, source })?;

  Ok(if existing.is_some() {
    FileOutcome::Updated
  } else {
    FileOutcome::Created
  })
}

/// Managed `package.json`: deep-merge the enforced overlay into whatever
/// is already on disk.
pub fn package_json_file(ctx: &ProjectContext) -> ManagedFile<'_> {
  ManagedFile::new(PACKAGE_JSON_PATH, move |existing| {
    Ok(manifest::merge_manifest(existing, ctx)?)
  })
}

/// Managed component entry: existing content is kept byte-for-byte, even
/// if the template has since changed; a fresh project gets the formatted
/// entry template.
pub fn component_entry_file(formatter: &dyn SourceFormatter) -> ManagedFile<'_> {
  ManagedFile::new(COMPONENT_ENTRY_PATH, move |existing| match existing {
    Some(text) => Ok(text.to_string()),
    None => {
      let rendered = templates::COMPONENT_ENTRY_TEMPLATE.replace("{package_name}", TOOL_PACKAGE_NAME);
      render(formatter, COMPONENT_ENTRY_PATH, &rendered)
    }
  })
}

/// Ensure the test stub.
///
/// If the file exists it is fully user-owned: no read, no pipe call, no
/// write. Stricter than the entry policy in that new content is never
/// even computed.
pub fn ensure_test_stub(
  ctx: &ProjectContext,
  fs: &dyn FileSystem,
  formatter: &dyn SourceFormatter,
) -> Result<FileOutcome, EnsureError> {
  let path = ctx.root.join(TEST_STUB_PATH);
  if fs.exists(&path) {
    info!(file = %path.display(), "test stub already exists");
    return Ok(FileOutcome::Skipped);
  }

  let stub = ManagedFile::new(TEST_STUB_PATH, |_| {
    render(formatter, TEST_STUB_PATH, templates::TEST_STUB_TEMPLATE)
  });
  ensure_file(fs, &ctx.root, &stub)
}

fn render(formatter: &dyn SourceFormatter, relative_path: &str, text: &str) -> Result<String, EnsureError> {
  formatter
    .format(text, Parser::TypeScript)
    .map_err(|source| EnsureError::Format {
      path: PathBuf::from(relative_path),
      source,
    })
}
