//! Status-tagged results for stages that degrade instead of failing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a stage produced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// The model answered and the answer was used as-is.
    Ok,
    /// A fixed fallback or the unchanged input was substituted.
    Degraded,
    /// The value carries an error description instead of generated content.
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Ok => "ok",
            GenerationStatus::Degraded => "degraded",
            GenerationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage result together with its status and an optional explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub status: GenerationStatus,
    pub note: Option<String>,
}

impl<T> Generated<T> {
    pub fn ok(value: T) -> Self {
        Self { value, status: GenerationStatus::Ok, note: None }
    }

    pub fn degraded(value: T, note: impl Into<String>) -> Self {
        Self { value, status: GenerationStatus::Degraded, note: Some(note.into()) }
    }

    pub fn failed(value: T, note: impl Into<String>) -> Self {
        Self { value, status: GenerationStatus::Failed, note: Some(note.into()) }
    }

    pub fn is_ok(&self) -> bool {
        self.status == GenerationStatus::Ok
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated { value: f(self.value), status: self.status, note: self.note }
    }
}
