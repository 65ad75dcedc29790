//! Generation request parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

pub const MIN_GRADE: i64 = 1;
pub const MAX_GRADE: i64 = 5;

/// Parameters supplied by the teacher for one generation session.
///
/// Fields are kept raw so that front ends can pass user input straight
/// through; [`GenerationRequest::validate`] enforces the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub grade: i64,
    pub curriculum: String,
    /// Duration label such as `"45 minutes"`.
    pub duration: String,
    pub model: String,
}

/// A request whose grade and duration have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub grade: u8,
    pub curriculum: String,
    pub duration_label: String,
    pub duration_minutes: u32,
    pub model: String,
}

impl GenerationRequest {
    pub fn new(
        grade: i64,
        curriculum: impl Into<String>,
        duration: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            grade,
            curriculum: curriculum.into(),
            duration: duration.into(),
            model: model.into(),
        }
    }

    /// Check the grade range alone. Research does not need a duration.
    pub fn validate_grade(&self) -> Result<u8, AppError> {
        validate_grade(self.grade)
    }

    pub fn validate(&self) -> Result<ValidatedRequest, AppError> {
        let grade = self.validate_grade()?;
        let duration_minutes = parse_duration_minutes(&self.duration)?;
        Ok(ValidatedRequest {
            grade,
            curriculum: self.curriculum.clone(),
            duration_label: self.duration.clone(),
            duration_minutes,
            model: self.model.clone(),
        })
    }
}

pub fn validate_grade(grade: i64) -> Result<u8, AppError> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(AppError::InvalidGrade(grade));
    }
    // Range-checked above.
    Ok(grade as u8)
}

/// Parse the leading whitespace-delimited token of a duration label as minutes.
///
/// `"45 minutes"` and `"45"` yield 45; `"45min"`, `"forty"`, `"0 minutes"`
/// and the empty string are rejected.
pub fn parse_duration_minutes(label: &str) -> Result<u32, AppError> {
    let invalid = || AppError::InvalidDuration(label.to_string());
    let token = label.split_whitespace().next().ok_or_else(invalid)?;
    let minutes = token.parse::<u32>().map_err(|_| invalid())?;
    if minutes == 0 {
        return Err(invalid());
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(grade: i64, duration: &str) -> GenerationRequest {
        GenerationRequest::new(grade, "US Common Core", duration, "gpt-3.5-turbo")
    }

    #[test]
    fn accepts_minutes_label() {
        let validated = request(3, "45 minutes").validate().unwrap();
        assert_eq!(validated.grade, 3);
        assert_eq!(validated.duration_minutes, 45);
        assert_eq!(validated.duration_label, "45 minutes");
    }

    #[test]
    fn accepts_bare_number_with_padding() {
        assert_eq!(parse_duration_minutes("  60 ").unwrap(), 60);
    }

    #[test]
    fn rejects_grades_outside_range() {
        for grade in [-1, 0, 6, 12] {
            let err = request(grade, "45 minutes").validate().unwrap_err();
            assert!(matches!(err, AppError::InvalidGrade(g) if g == grade));
        }
    }

    #[test]
    fn rejects_unparseable_durations() {
        for label in ["", "   ", "forty minutes", "45min", "0 minutes", "-10 minutes", "4.5 hours"]
        {
            let err = parse_duration_minutes(label).unwrap_err();
            assert!(matches!(err, AppError::InvalidDuration(_)), "label {label:?}");
        }
    }

    #[test]
    fn grade_is_checked_before_duration() {
        let err = request(9, "soon").validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidGrade(9)));
    }
}
