//! Shared constants for managed project files.

/// npm package name of the tool whose dependency entry this engine manages.
pub const TOOL_PACKAGE_NAME: &str = "pri";

/// Relative path of the component entry module.
pub const COMPONENT_ENTRY_PATH: &str = "src/index.tsx";

/// Relative path of the scaffolded test stub.
pub const TEST_STUB_PATH: &str = "tests/index.ts";

/// Relative path of the npm manifest.
pub const PACKAGE_JSON_PATH: &str = "package.json";

/// Path prefix that marks a project as having a components directory.
pub const COMPONENTS_DIR_PREFIX: &str = "src/components";

/// Version pin enforced for the runtime dependency.
pub const BABEL_RUNTIME_VERSION: &str = "^7.0.0";

/// Build lifecycle script enforced in `scripts.prepublishOnly`.
pub const PREPUBLISH_SCRIPT: &str = "npm run build";
