//! Structural deep-merge of the npm manifest.
//!
//! The manifest is treated as an untyped JSON tree for the generic merge,
//! with typed accessors for the handful of fields the engine enforces.
//! Object maps preserve insertion order, so existing keys serialize first
//! and newly introduced overlay keys are appended.

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::consts::{BABEL_RUNTIME_VERSION, COMPONENT_ENTRY_PATH, PREPUBLISH_SCRIPT, TOOL_PACKAGE_NAME};
use crate::context::ProjectContext;

/// Errors that can occur while merging the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Existing manifest text is not valid JSON. Surfaced, never discarded:
  /// silently replacing a user's manifest is unacceptable.
  #[error("malformed package.json: {source}")]
  Parse {
    #[source]
    source: serde_json::Error,
  },

  /// Merged tree could not be serialized.
  #[error("failed to serialize package.json: {source}")]
  Serialize {
    #[source]
    source: serde_json::Error,
  },
}

/// Merge the enforced field overlay into the existing manifest text.
///
/// Steps, in order:
/// 1. Parse `existing`, or start from an empty object if absent.
/// 2. Resolve the tool version: pinned dev dependency, then pinned regular
///    dependency, then our own version.
/// 3. Remove the regular-dependency entry for the tool.
/// 4. Pin the dev-dependency entry to the resolved version.
/// 5. Recursively merge the fixed overlay (`main`, `types`, lifecycle
///    script, runtime dependency pin).
/// 6. Serialize with insertion-order keys, two-space indent, and a
///    trailing newline.
///
/// The relocation in steps 3-4 runs before the generic merge so the merge
/// cannot resurrect the removed `dependencies` entry.
pub fn merge_manifest(existing: Option<&str>, ctx: &ProjectContext) -> Result<String, ManifestError> {
  let mut tree = match existing {
    Some(text) => serde_json::from_str(text).map_err(|source| ManifestError::Parse { source })?,
    None => Value::Object(Map::new()),
  };

  let tool_version = dependency_version(&tree, "devDependencies", TOOL_PACKAGE_NAME)
    .or_else(|| dependency_version(&tree, "dependencies", TOOL_PACKAGE_NAME))
    .unwrap_or(&ctx.own_version)
    .to_string();

  remove_dependency(&mut tree, "dependencies", TOOL_PACKAGE_NAME);
  set_dependency(&mut tree, "devDependencies", TOOL_PACKAGE_NAME, &tool_version);

  let overlay = json!({
    "main": format!("{}/index.js", ctx.config.dist_dir),
    "types": COMPONENT_ENTRY_PATH,
    "scripts": { "prepublishOnly": PREPUBLISH_SCRIPT },
    "dependencies": { "@babel/runtime": BABEL_RUNTIME_VERSION },
  });
  deep_merge(&mut tree, overlay);

  let mut out = serde_json::to_string_pretty(&tree).map_err(|source| ManifestError::Serialize { source })?;
  out.push('\n');
  Ok(out)
}

/// Union-recursive merge of two JSON trees.
///
/// Object pairs union their keys, recursing per shared key. Any other
/// pair takes the overlay value outright; arrays are never element-merged.
pub fn deep_merge(base: &mut Value, overlay: Value) {
  match (base, overlay) {
    (Value::Object(base_map), Value::Object(overlay_map)) => {
      for (key, value) in overlay_map {
        match base_map.get_mut(&key) {
          Some(slot) => deep_merge(slot, value),
          None => {
            base_map.insert(key, value);
          }
        }
      }
    }
    (slot, value) => *slot = value,
  }
}

fn dependency_version<'a>(tree: &'a Value, section: &str, name: &str) -> Option<&'a str> {
  tree
    .get(section)?
    .get(name)?
    .as_str()
    .filter(|version| !version.is_empty())
}

fn remove_dependency(tree: &mut Value, section: &str, name: &str) {
  if let Some(deps) = tree.get_mut(section).and_then(Value::as_object_mut) {
    deps.remove(name);
  }
}

fn set_dependency(tree: &mut Value, section: &str, name: &str, version: &str) {
  let Some(root) = tree.as_object_mut() else {
    return;
  };
  let slot = root
    .entry(section.to_string())
    .or_insert_with(|| Value::Object(Map::new()));
  // A non-object section (e.g. a stray scalar) cannot hold the pin;
  // replace it so the entry is always written.
  if !slot.is_object() {
    *slot = Value::Object(Map::new());
  }
  if let Some(deps) = slot.as_object_mut() {
    deps.insert(name.to_string(), Value::String(version.to_string()));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::ProjectContext;

  fn ctx() -> ProjectContext {
    ProjectContext::new("/tmp/project").with_own_version("0.2.0")
  }

  fn merged_value(existing: Option<&str>) -> Value {
    let text = merge_manifest(existing, &ctx()).unwrap();
    serde_json::from_str(&text).unwrap()
  }

  #[test]
  fn empty_project_gets_full_overlay() {
    let tree = merged_value(None);

    assert_eq!(tree["main"], "dist/index.js");
    assert_eq!(tree["types"], "src/index.tsx");
    assert_eq!(tree["scripts"]["prepublishOnly"], "npm run build");
    assert_eq!(tree["dependencies"]["@babel/runtime"], "^7.0.0");
    assert_eq!(tree["devDependencies"]["pri"], "0.2.0");
  }

  #[test]
  fn dev_dependency_pin_wins_over_regular() {
    let tree = merged_value(Some(
      r#"{ "devDependencies": { "pri": "1.2.3" }, "dependencies": { "pri": "9.9.9" } }"#,
    ));

    assert_eq!(tree["devDependencies"]["pri"], "1.2.3");
    assert!(tree["dependencies"].get("pri").is_none());
  }

  #[test]
  fn regular_dependency_pin_is_relocated() {
    let tree = merged_value(Some(r#"{ "dependencies": { "pri": "2.0.0" } }"#));

    assert_eq!(tree["devDependencies"]["pri"], "2.0.0");
    assert!(tree["dependencies"].get("pri").is_none());
    // The section itself survives for the runtime dependency pin.
    assert_eq!(tree["dependencies"]["@babel/runtime"], "^7.0.0");
  }

  #[test]
  fn scalar_dev_dependencies_section_is_replaced() {
    let tree = merged_value(Some(r#"{ "devDependencies": "oops" }"#));

    assert!(tree["devDependencies"].is_object());
    assert_eq!(tree["devDependencies"]["pri"], "0.2.0");
  }

  #[test]
  fn empty_string_pin_falls_through() {
    let tree = merged_value(Some(
      r#"{ "devDependencies": { "pri": "" }, "dependencies": { "pri": "2.0.0" } }"#,
    ));
    assert_eq!(tree["devDependencies"]["pri"], "2.0.0");

    let tree = merged_value(Some(r#"{ "devDependencies": { "pri": "" } }"#));
    assert_eq!(tree["devDependencies"]["pri"], "0.2.0");
  }

  #[test]
  fn fallback_to_own_version() {
    let tree = merged_value(Some(r#"{ "name": "demo" }"#));
    assert_eq!(tree["devDependencies"]["pri"], "0.2.0");
  }

  #[test]
  fn overlay_unions_with_existing_scripts() {
    let tree = merged_value(Some(r#"{ "scripts": { "test": "x" } }"#));

    assert_eq!(tree["scripts"]["test"], "x");
    assert_eq!(tree["scripts"]["prepublishOnly"], "npm run build");
  }

  #[test]
  fn scalar_fields_are_overwritten() {
    let tree = merged_value(Some(r#"{ "main": "lib/old.js", "types": "old.d.ts" }"#));

    assert_eq!(tree["main"], "dist/index.js");
    assert_eq!(tree["types"], "src/index.tsx");
  }

  #[test]
  fn existing_keys_serialize_first() {
    let text = merge_manifest(Some(r#"{ "name": "demo", "version": "1.0.0" }"#), &ctx()).unwrap();

    let name_at = text.find("\"name\"").unwrap();
    let main_at = text.find("\"main\"").unwrap();
    assert!(name_at < main_at, "existing keys should precede overlay keys");
    assert!(text.ends_with('\n'));
    assert!(text.contains("\n  \"name\""), "two-space indentation expected");
  }

  #[test]
  fn malformed_manifest_is_fatal() {
    let result = merge_manifest(Some("{ not json"), &ctx());
    assert!(matches!(result, Err(ManifestError::Parse { .. })));
  }

  #[test]
  fn merge_is_idempotent() {
    let once = merge_manifest(Some(r#"{ "name": "demo", "dependencies": { "pri": "1.0.0" } }"#), &ctx()).unwrap();
    let twice = merge_manifest(Some(&once), &ctx()).unwrap();
    assert_eq!(once, twice);
  }

  #[test]
  fn deep_merge_overlay_replaces_arrays() {
    let mut base = json!({ "files": ["a", "b"], "keep": [1] });
    deep_merge(&mut base, json!({ "files": ["c"] }));

    assert_eq!(base["files"], json!(["c"]));
    assert_eq!(base["keep"], json!([1]));
  }

  #[test]
  fn deep_merge_recurses_nested_objects() {
    let mut base = json!({ "a": { "b": { "c": 1 }, "d": 2 } });
    deep_merge(&mut base, json!({ "a": { "b": { "e": 3 } } }));

    assert_eq!(base, json!({ "a": { "b": { "c": 1, "e": 3 }, "d": 2 } }));
  }
}
