//! Extraction of a research batch from free-form model output.

use serde::Deserialize;

use super::AppError;
use super::topic::{ResearchBatch, TopicCandidate};

const RESEARCH_JSON: &str = "research JSON";

/// Outcome of parsing a research response.
#[derive(Debug)]
pub struct ParsedResearch {
    pub batch: ResearchBatch,
    /// Set when the fixed fallback batch replaced the model output.
    pub used_fallback: bool,
    /// Why the fallback was used, always [`AppError::ParseError`].
    pub reason: Option<AppError>,
}

impl ParsedResearch {
    fn parsed(batch: ResearchBatch) -> Self {
        Self { batch, used_fallback: false, reason: None }
    }

    pub fn fallback(details: impl Into<String>) -> Self {
        Self {
            batch: ResearchBatch::fallback(),
            used_fallback: true,
            reason: Some(AppError::parse_error(RESEARCH_JSON, details)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResearchPayload {
    topics: Option<Vec<TopicCandidate>>,
}

/// Parse raw model text into a research batch.
///
/// The span from the first `{` to the last `}` is tried first so that prose
/// around the JSON object is tolerated; the whole text is tried next. When
/// neither yields a non-empty `topics` list the fallback batch is returned.
pub fn parse_research(raw: &str) -> ParsedResearch {
    let trimmed = raw.trim();
    let Some(span) = embedded_object(trimmed) else {
        return ParsedResearch::fallback("response contained no JSON object");
    };

    let span_error = match parse_payload(span) {
        Ok(batch) => return ParsedResearch::parsed(batch),
        Err(err) => err,
    };

    if span != trimmed {
        if let Ok(batch) = parse_payload(trimmed) {
            return ParsedResearch::parsed(batch);
        }
    }

    ParsedResearch::fallback(span_error)
}

fn embedded_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn parse_payload(text: &str) -> Result<ResearchBatch, String> {
    let payload: ResearchPayload =
        serde_json::from_str(text).map_err(|e| e.to_string())?;
    match payload.topics {
        Some(topics) if !topics.is_empty() => Ok(ResearchBatch::new(topics)),
        Some(_) => Err("the 'topics' list is empty".to_string()),
        None => Err("the 'topics' list is missing".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TopicContext;
    use pretty_assertions::assert_eq;

    fn sample_batch() -> ResearchBatch {
        ResearchBatch::new(vec![
            TopicCandidate {
                title: "Fractions on a number line".to_string(),
                description: "Place unit fractions between 0 and 1.".to_string(),
                learning_outcome: "Locate 1/2, 1/3 and 1/4 on a number line".to_string(),
                context: TopicContext {
                    key_concepts: vec!["unit fraction".into(), "equal parts".into()],
                    misconceptions: vec!["larger denominator means larger fraction".into()],
                    prerequisites: vec!["counting to 20".into()],
                    examples: vec!["fold a paper strip in halves".into()],
                },
            },
            TopicCandidate {
                title: "Area by tiling".to_string(),
                description: "Cover rectangles with unit squares.".to_string(),
                learning_outcome: "Find the area of a 3 by 4 rectangle".to_string(),
                context: TopicContext::default(),
            },
        ])
    }

    #[test]
    fn extracts_object_surrounded_by_prose() {
        let batch = sample_batch();
        let json = serde_json::to_string_pretty(&batch).unwrap();
        let raw = format!("Sure! Here it is:\n{}\nHappy teaching.", json);

        let parsed = parse_research(&raw);
        assert!(!parsed.used_fallback);
        assert_eq!(parsed.batch, batch);
    }

    #[test]
    fn trailing_braces_after_object_use_fallback() {
        let json = serde_json::to_string(&sample_batch()).unwrap();
        let raw = format!("{}\n\nLet me know if {{}} helps.", json);

        let parsed = parse_research(&raw);
        assert!(parsed.used_fallback);
    }

    #[test]
    fn parses_bare_json() {
        let batch = sample_batch();
        let parsed = parse_research(&serde_json::to_string(&batch).unwrap());
        assert_eq!(parsed.batch, batch);
        assert!(parsed.reason.is_none());
    }

    #[test]
    fn missing_context_lists_default_to_empty() {
        let raw = r#"{"topics":[{"title":"Skip counting","description":"d",
            "learning_outcome":"o","context":{"key_concepts":["twos"]}}]}"#;
        let parsed = parse_research(raw);
        assert!(!parsed.used_fallback);
        let context = &parsed.batch.topics[0].context;
        assert_eq!(context.key_concepts, vec!["twos"]);
        assert!(context.examples.is_empty());
    }

    #[test]
    fn unparseable_text_uses_fallback() {
        let parsed = parse_research("I'm sorry, I cannot help with that.");
        assert!(parsed.used_fallback);
        let reason = parsed.reason.as_ref().map(ToString::to_string);
        assert_eq!(
            reason.as_deref(),
            Some("Failed to parse research JSON: response contained no JSON object")
        );
        assert_eq!(parsed.batch, ResearchBatch::fallback());
        let titles: Vec<_> = parsed.batch.topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Addition", "Subtraction"]);
    }

    #[test]
    fn object_without_topics_uses_fallback() {
        let parsed = parse_research(r#"{"suggestions": []}"#);
        assert!(parsed.used_fallback);
        match parsed.reason {
            Some(AppError::ParseError { what, details }) => {
                assert_eq!(what, "research JSON");
                assert_eq!(details, "the 'topics' list is missing");
            }
            other => panic!("unexpected reason: {:?}", other),
        }
    }

    #[test]
    fn empty_topics_uses_fallback() {
        let parsed = parse_research(r#"{"topics": []}"#);
        assert!(parsed.used_fallback);
        assert_eq!(parsed.batch.len(), 2);
    }

    #[test]
    fn truncated_json_uses_fallback() {
        let parsed = parse_research(r#"{"topics": [{"title": "Addition""#);
        assert!(parsed.used_fallback);
        assert!(parsed.reason.is_some());
    }
}
