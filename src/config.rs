use std::env;
use std::path::PathBuf;

use anyhow::{Result, ensure};

pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7878";
pub const DEFAULT_FILE_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    pub document_name: String,
    pub bind_addr: String,
    pub log_dir: Option<PathBuf>,
    pub file_log_filter: String,
}

impl PluginSettings {
    pub fn from_env() -> Result<Self> {
        // Load .env if present, but do not fail if file does not exist.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let document_name = lookup("FIGVAR_DOCUMENT_NAME")
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_owned());
        ensure!(
            !document_name.trim().is_empty(),
            "FIGVAR_DOCUMENT_NAME cannot be empty"
        );

        let bind_addr = lookup("FIGVAR_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        ensure!(!bind_addr.trim().is_empty(), "FIGVAR_BIND cannot be empty");

        let log_dir = read_optional(&lookup, "FIGVAR_LOG_DIR").map(PathBuf::from);
        let file_log_filter = read_optional(&lookup, "FIGVAR_FILE_LOG")
            .unwrap_or_else(|| DEFAULT_FILE_LOG_FILTER.to_owned());

        Ok(Self {
            document_name,
            bind_addr,
            log_dir,
            file_log_filter,
        })
    }
}

fn read_optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
