//! Topic candidates produced by the research stage.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Pedagogical context attached to a topic candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContext {
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub misconceptions: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// One suggested teachable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub learning_outcome: String,
    #[serde(default)]
    pub context: TopicContext,
}

impl TopicCandidate {
    /// Render the context as the labelled text block fed into plan and worksheet prompts.
    pub fn context_block(&self) -> String {
        let ctx = &self.context;
        format!(
            "KEY CONCEPTS:\n{}\n\nCOMMON MISCONCEPTIONS:\n{}\n\n\
             PREREQUISITES:\n{}\n\nTEACHING EXAMPLES:\n{}",
            ctx.key_concepts.join(", "),
            ctx.misconceptions.join(", "),
            ctx.prerequisites.join(", "),
            ctx.examples.join(", "),
        )
    }

    /// The learning outcome, or the title when research left it empty.
    pub fn outcome_or_title(&self) -> &str {
        if self.learning_outcome.trim().is_empty() { &self.title } else { &self.learning_outcome }
    }
}

/// Ordered topic candidates returned by one research call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchBatch {
    pub topics: Vec<TopicCandidate>,
}

impl ResearchBatch {
    pub fn new(topics: Vec<TopicCandidate>) -> Self {
        Self { topics }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a candidate by its zero-based position in the batch.
    pub fn select(&self, index: usize) -> Result<&TopicCandidate, AppError> {
        self.topics.get(index).ok_or(AppError::IndexOutOfRange { index, len: self.topics.len() })
    }

    /// Topics substituted when the research response cannot be used.
    pub fn fallback() -> Self {
        Self::new(vec![
            topic(
                "Addition",
                "Basic addition operations",
                "Add two-digit numbers",
                &["Place value", "Regrouping"],
                &["Forgetting to regroup"],
                "23 + 45 = 68",
            ),
            topic(
                "Subtraction",
                "Basic subtraction operations",
                "Subtract two-digit numbers",
                &["Place value", "Borrowing"],
                &["Subtracting the smaller from the larger digit"],
                "45 - 23 = 22",
            ),
        ])
    }
}

fn topic(
    title: &str,
    description: &str,
    outcome: &str,
    key_concepts: &[&str],
    misconceptions: &[&str],
    example: &str,
) -> TopicCandidate {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    TopicCandidate {
        title: title.to_string(),
        description: description.to_string(),
        learning_outcome: outcome.to_string(),
        context: TopicContext {
            key_concepts: owned(key_concepts),
            misconceptions: owned(misconceptions),
            prerequisites: vec!["Number recognition".to_string()],
            examples: vec![example.to_string()],
        },
    }
}
