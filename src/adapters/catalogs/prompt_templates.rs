//! Embedded catalog of stage prompt templates.
//!
//! Templates are compiled into the binary and resolved by file name.

use include_dir::{Dir, include_dir};

static PROMPT_TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/prompts");

/// Read a prompt template by its file name (e.g. `"research.j2"`).
pub fn read_prompt_template(name: &str) -> Option<String> {
    PROMPT_TEMPLATE_DIR.get_file(name).and_then(|file| file.contents_utf8()).map(|s| s.to_string())
}
