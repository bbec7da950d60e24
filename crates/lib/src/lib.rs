//! groundwork-lib: idempotent synthesis of managed project files.
//!
//! This crate guarantees that a component project on disk carries the
//! generated artifacts it needs (a component entry module, a test stub,
//! and the enforced `package.json` fields) without destroying content
//! the user has written:
//!
//! - free-form source files are generated only if absent
//! - the npm manifest is deep-merged with field-level override rules
//! - the test stub is scaffolded once, then fully user-owned
//!
//! Every ensure operation is idempotent: running it once or a hundred
//! times against a project in any prior state converges to the same
//! final content.

pub mod analysis;
pub mod consts;
pub mod context;
pub mod ensure;
pub mod manifest;
pub mod services;
