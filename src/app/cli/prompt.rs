//! `dialoguer` prompts. Every helper returns `Ok(None)` when the user cancels.

use std::io::ErrorKind;

use dialoguer::{Confirm, Error as DialoguerError, Input, Password, Select};

use crate::domain::AppError;

fn cancelled<T>(result: Result<T, DialoguerError>, what: &str) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::config_error(format!("Failed to read {}: {}", what, err))),
    }
}

pub(super) fn api_key() -> Result<Option<String>, AppError> {
    cancelled(Password::new().with_prompt("OpenAI API key").interact(), "API key")
}

pub(super) fn text(prompt: &str, default: &str) -> Result<Option<String>, AppError> {
    cancelled(
        Input::<String>::new().with_prompt(prompt).default(default.to_string()).interact_text(),
        prompt,
    )
}

pub(super) fn optional_text(prompt: &str) -> Result<Option<String>, AppError> {
    cancelled(Input::<String>::new().with_prompt(prompt).allow_empty(true).interact_text(), prompt)
}

pub(super) fn select<T: ToString>(
    prompt: &str,
    items: &[T],
    default: usize,
) -> Result<Option<usize>, AppError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()
        .map_err(|err| AppError::config_error(format!("Failed to read {}: {}", prompt, err)))
}

pub(super) fn confirm(prompt: &str, default: bool) -> Result<Option<bool>, AppError> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .map_err(|err| AppError::config_error(format!("Failed to read {}: {}", prompt, err)))
}
