//! Lesson and worksheet artifacts passed between pipeline stages.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::time_allocation::LessonSection;
use super::topic::TopicCandidate;

/// Body prefix marking a lesson plan whose generation failed.
pub const LESSON_ERROR_PREFIX: &str = "Error generating lesson plan:";
/// Body prefix marking a worksheet whose generation failed.
pub const WORKSHEET_ERROR_PREFIX: &str = "Error generating worksheet:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    /// One or two sentences per section.
    Summary,
    /// The complete plan.
    Full,
    /// A full plan rewritten into the master format.
    Enhanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonArtifact {
    pub body: String,
    pub source_topic: TopicCandidate,
    pub duration_minutes: u32,
    pub section_time_allocations: BTreeMap<LessonSection, u32>,
    pub kind: LessonKind,
}

impl LessonArtifact {
    pub fn is_error(&self) -> bool {
        self.body.starts_with(LESSON_ERROR_PREFIX)
    }

    /// Copy of this lesson with a new body, as produced by enhancement.
    pub fn with_body(&self, body: String, kind: LessonKind) -> Self {
        Self { body, kind, ..self.clone() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Mixed,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Mixed => "mixed",
        }
    }

    /// Fixed instruction inserted verbatim into the worksheet prompt.
    pub fn instructions(&self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "Create EASY problems that focus on basic understanding and confidence building. \
                 Use straightforward examples with minimal steps."
            }
            Difficulty::Medium => {
                "Create MEDIUM difficulty problems that build on the basics but require some \
                 application of concepts."
            }
            Difficulty::Hard => {
                "Create CHALLENGING problems that extend concepts further and require deeper \
                 thinking and multiple steps."
            }
            Difficulty::Mixed => {
                "Include a MIX OF DIFFICULTIES: Start with 2 easy problems, then 2 medium \
                 problems, and end with 1-2 challenging extension problems."
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            other => Err(format!(
                "unknown difficulty '{}': expected easy, medium, hard or mixed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetArtifact {
    pub body: String,
    pub difficulty: Difficulty,
    pub aligned_lesson: LessonArtifact,
}

impl WorksheetArtifact {
    pub fn is_error(&self) -> bool {
        self.body.starts_with(WORKSHEET_ERROR_PREFIX)
    }
}

/// Which artifact a refinement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    LessonPlan,
    Worksheet,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::LessonPlan => "lesson plan",
            ArtifactKind::Worksheet => "worksheet",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" mixed ".parse::<Difficulty>().unwrap(), Difficulty::Mixed);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn mixed_blurb_spells_out_problem_counts() {
        let blurb = Difficulty::Mixed.instructions();
        assert!(blurb.contains("2 easy problems"));
        assert!(blurb.contains("2 medium problems"));
        assert!(blurb.contains("1-2 challenging"));
    }

    #[test]
    fn each_difficulty_has_distinct_instructions() {
        let blurbs: HashSet<_> = Difficulty::ALL.iter().map(|d| d.instructions()).collect();
        assert_eq!(blurbs.len(), Difficulty::ALL.len());
    }
}
