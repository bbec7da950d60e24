//! Collaborator contracts for the ensure engine.
//!
//! The engine performs no direct I/O and no real formatting; the host
//! supplies those services through the traits below. Everything is
//! synchronous from the engine's point of view.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Source languages the formatter can be asked to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
  TypeScript,
}

impl std::fmt::Display for Parser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Parser::TypeScript => write!(f, "typescript"),
    }
  }
}

/// Formatter failure. Fatal for the file being generated: unformatted or
/// partially rendered text is never written.
#[derive(Debug, Error)]
#[error("formatter failed: {message}")]
pub struct FormatError {
  pub message: String,
}

impl FormatError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Pretty-printer for generated source text.
///
/// Implementations must be pure string transforms and may fail on
/// syntactically invalid input.
pub trait SourceFormatter {
  fn format(&self, source: &str, parser: Parser) -> Result<String, FormatError>;
}

/// Identity formatter. Hosts that pretty-print generated source plug in
/// their own implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughFormatter;

impl SourceFormatter for PassthroughFormatter {
  fn format(&self, source: &str, _parser: Parser) -> Result<String, FormatError> {
    Ok(source.to_string())
  }
}

/// Filesystem primitives the engine needs.
pub trait FileSystem {
  fn exists(&self, path: &Path) -> bool;

  /// Read a file as UTF-8 text. `Ok(None)` means the file does not exist.
  fn read_text(&self, path: &Path) -> io::Result<Option<String>>;

  /// Write text, creating parent directories as needed.
  fn write_text(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Production [`FileSystem`] over [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn read_text(&self, path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
      Ok(text) => Ok(Some(text)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn write_text(&self, path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn read_text_absent_file_is_none() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem;

    let result = fs.read_text(&temp.path().join("missing.txt")).unwrap();
    assert!(result.is_none());
  }

  #[test]
  fn write_text_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let fs = OsFileSystem;
    let path = temp.path().join("nested").join("dir").join("file.txt");

    fs.write_text(&path, "hello").unwrap();

    assert!(fs.exists(&path));
    assert_eq!(fs.read_text(&path).unwrap().unwrap(), "hello");
  }

  #[test]
  fn passthrough_formatter_returns_input() {
    let formatter = PassthroughFormatter;
    let out = formatter.format("const a = 1", Parser::TypeScript).unwrap();
    assert_eq!(out, "const a = 1");
  }

  #[test]
  fn parser_display_matches_host_names() {
    assert_eq!(Parser::TypeScript.to_string(), "typescript");
  }
}
