use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::document::VariablesDocument;

/// Three collections: a single-mode palette, a two-mode theme aliasing into
/// the palette, and a single-mode scale whose name contains a space.
pub const SAMPLE_DOCUMENT_JSON: &str = r#"{
  "Core": {
    "name": "Core",
    "modes": [{"name": "Default", "id": "1:0"}],
    "variables": [
      {"id": "VariableID:1:1", "name": "color/white", "type": "COLOR",
       "value": {"Default": {"r": 1, "g": 1, "b": 1, "a": 1}}},
      {"id": "VariableID:1:2", "name": "color/black", "type": "COLOR",
       "value": {"Default": {"r": 0, "g": 0, "b": 0, "a": 1}}},
      {"id": "VariableID:1:3", "name": "font family", "type": "STRING",
       "value": {"Default": "Inter"}}
    ]
  },
  "Theme": {
    "name": "Theme",
    "modes": [{"name": "Light", "id": "2:0"}, {"name": "Dark", "id": "2:1"}],
    "variables": [
      {"id": "VariableID:2:1", "name": "surface", "type": "COLOR",
       "value": {
         "Light": {"type": "VARIABLE_ALIAS", "id": "VariableID:1:1", "name": "--core-color/white"},
         "Dark": {"type": "VARIABLE_ALIAS", "id": "VariableID:1:2", "name": "--core-color/black"}
       }},
      {"id": "VariableID:2:2", "name": "overlay", "type": "COLOR",
       "value": {
         "Light": {"r": 0, "g": 0, "b": 0, "a": 0.5},
         "Dark": {"r": 1, "g": 1, "b": 1, "a": 0.25}
       }}
    ]
  },
  "Spacing Scale": {
    "name": "Spacing Scale",
    "modes": [{"name": "Mode 1", "id": "3:0"}],
    "variables": [
      {"id": "VariableID:3:1", "name": "gap sm", "type": "FLOAT", "value": {"Mode 1": 4}},
      {"id": "VariableID:3:2", "name": "dense", "type": "BOOLEAN", "value": {"Mode 1": false}}
    ]
  }
}"#;

/// CSS produced after importing [`SAMPLE_DOCUMENT_JSON`] into an empty graph.
pub const SAMPLE_DOCUMENT_CSS: &str = ":root {

  /* Core */

  --core-color-white: #ffffff;
  --core-color-black: #000000;
  --core-font-family: \"Inter\";

  /* Theme */

  --theme-surface-light: var(--core-color/white);
  --theme-surface-dark: var(--core-color/black);
  --theme-overlay-light: rgba(0, 0, 0, 0.5);
  --theme-overlay-dark: rgba(1, 1, 1, 0.25);

  /* Spacing Scale */

  --spacingscale-gap-sm: 4;
  --spacingscale-dense: false;
}
";

pub fn sample_document() -> VariablesDocument {
    match VariablesDocument::from_json(SAMPLE_DOCUMENT_JSON) {
        Ok(document) => document,
        Err(error) => panic!("sample document must parse: {error}"),
    }
}

pub fn temp_path(prefix: &str) -> PathBuf {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "figvar_{prefix}_{}_{}",
        std::process::id(),
        now_ns
    ))
}

pub fn remove_dir_if_exists(path: &Path) {
    let _ = std::fs::remove_dir_all(path);
}

pub fn apply_figvar_test_env(command: &mut Command, document_name: &str, log_dir: &Path) {
    command.env("FIGVAR_DOCUMENT_NAME", document_name);
    command.env("FIGVAR_BIND", "127.0.0.1:0");
    command.env("FIGVAR_LOG_DIR", log_dir.as_os_str());
    command.env("FIGVAR_FILE_LOG", "debug");
    command.env("RUST_LOG", "error");
}
