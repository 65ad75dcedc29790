pub mod prompt_templates;

pub use self::prompt_templates::read_prompt_template;
