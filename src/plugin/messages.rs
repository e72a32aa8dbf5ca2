use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;
use crate::rename::RenameScope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginRequest {
    Start,
    Close,
    CreateRectangles {
        count: u32,
    },
    ImportJson {
        text: String,
    },
    ShowJson,
    SaveJson,
    ClearVars,
    SaveCss,
    ShowCss,
    #[serde(rename_all = "camelCase")]
    ReplaceVars {
        find_string: String,
        replace_string: String,
        #[serde(default)]
        in_vars: bool,
        #[serde(default)]
        in_collections: bool,
        #[serde(default)]
        in_modes: bool,
        #[serde(default)]
        in_groups: bool,
    },
    Realias {
        varname: String,
        alias: String,
    },
}

impl PluginRequest {
    pub fn from_json(raw: &str) -> Result<Self, SyncError> {
        serde_json::from_str(raw).map_err(|error| SyncError::InvalidRequest {
            reason: error.to_string(),
        })
    }

    pub fn from_value(raw: Value) -> Result<Self, SyncError> {
        serde_json::from_value(raw).map_err(|error| SyncError::InvalidRequest {
            reason: error.to_string(),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Close => "close",
            Self::CreateRectangles { .. } => "create-rectangles",
            Self::ImportJson { .. } => "import-json",
            Self::ShowJson => "show-json",
            Self::SaveJson => "save-json",
            Self::ClearVars => "clear-vars",
            Self::SaveCss => "save-css",
            Self::ShowCss => "show-css",
            Self::ReplaceVars { .. } => "replace-vars",
            Self::Realias { .. } => "realias",
        }
    }
}

pub fn rename_scope(
    in_vars: bool,
    in_collections: bool,
    in_modes: bool,
    in_groups: bool,
) -> RenameScope {
    RenameScope {
        variables: in_vars,
        collections: in_collections,
        modes: in_modes,
        groups: in_groups,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    #[serde(rename = "figmaDocName")]
    pub document_name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum PluginMessage {
    PopulateTextarea(String),
    SaveJson(SavePayload),
    SaveCss(SavePayload),
    FindreplaceInfo(String),
}
