//! API key storage in a local `.env` file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::{API_KEY_VAR, CredentialStore};

pub const ENV_FILE: &str = ".env";
const ENV_FILE_HEADER: &str = "# API Keys for Lesson Plan Generator";

/// Reads the key from the process environment first, then from a dotenv file.
#[derive(Debug, Clone)]
pub struct EnvFileCredentialStore {
    path: PathBuf,
    read_process_env: bool,
}

impl EnvFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), read_process_env: true }
    }

    /// Only consult the file, never the process environment.
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), read_process_env: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file_key(&self) -> Result<Option<String>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let entries = dotenvy::from_path_iter(&self.path).map_err(|e| {
            AppError::config_error(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        for entry in entries {
            let (name, value) = entry.map_err(|e| {
                AppError::config_error(format!("Failed to parse {}: {}", self.path.display(), e))
            })?;
            if name == API_KEY_VAR {
                return Ok(non_empty(value));
            }
        }
        Ok(None)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

impl CredentialStore for EnvFileCredentialStore {
    fn load_api_key(&self) -> Result<Option<String>, AppError> {
        if self.read_process_env
            && let Some(key) = std::env::var(API_KEY_VAR).ok().and_then(non_empty)
        {
            return Ok(Some(key));
        }
        self.read_file_key()
    }

    fn save_api_key(&self, key: &str) -> Result<(), AppError> {
        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)?
        } else {
            format!("{}\n", ENV_FILE_HEADER)
        };

        let assignment = format!("{}={}", API_KEY_VAR, key.trim());
        let prefix = format!("{}=", API_KEY_VAR);
        let mut replaced = false;
        let mut lines: Vec<String> = existing
            .lines()
            .map(|line| {
                if line.starts_with(&prefix) {
                    replaced = true;
                    assignment.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(assignment);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", lines.join("\n")))?;
        tracing::info!(path = %self.path.display(), "saved API key");
        Ok(())
    }
}
