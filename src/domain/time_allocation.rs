//! Proportional split of lesson minutes across instructional sections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Timed section of a generated lesson plan, in teaching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonSection {
    Introduction,
    MainActivity,
    Practice,
    Assessment,
    Conclusion,
}

impl LessonSection {
    pub const ALL: [LessonSection; 5] = [
        LessonSection::Introduction,
        LessonSection::MainActivity,
        LessonSection::Practice,
        LessonSection::Assessment,
        LessonSection::Conclusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LessonSection::Introduction => "Introduction",
            LessonSection::MainActivity => "Main activity",
            LessonSection::Practice => "Practice",
            LessonSection::Assessment => "Assessment",
            LessonSection::Conclusion => "Conclusion",
        }
    }
}

impl fmt::Display for LessonSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minutes assigned to each lesson section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAllocation {
    pub total_minutes: u32,
    pub introduction: u32,
    pub main_activity: u32,
    pub practice: u32,
    pub assessment: u32,
    pub conclusion: u32,
    /// The section floors did not fit and the conclusion was clamped to zero.
    pub infeasible: bool,
}

/// Shortest lesson for which the section floors leave a non-negative conclusion.
pub const MIN_FEASIBLE_MINUTES: u32 = 35;

impl TimeAllocation {
    /// Split `total_minutes` with floored percentages and per-section minimums:
    /// introduction 15% (min 5), main activity 50% (min 10), practice 20%
    /// (min 5), assessment 10% (min 5), conclusion takes the remainder.
    pub fn allocate(total_minutes: u32) -> Self {
        let share = |percent: u64, floor: u32| {
            ((u64::from(total_minutes) * percent / 100) as u32).max(floor)
        };

        let introduction = share(15, 5);
        let main_activity = share(50, 10);
        let practice = share(20, 5);
        let assessment = share(10, 5);
        let assigned = introduction + main_activity + practice + assessment;

        let infeasible = assigned > total_minutes;
        if infeasible {
            tracing::warn!(
                total_minutes,
                assigned,
                "lesson is too short for the section minimums; conclusion clamped to 0"
            );
        }

        Self {
            total_minutes,
            introduction,
            main_activity,
            practice,
            assessment,
            conclusion: total_minutes.saturating_sub(assigned),
            infeasible,
        }
    }

    pub fn minutes(&self, section: LessonSection) -> u32 {
        match section {
            LessonSection::Introduction => self.introduction,
            LessonSection::MainActivity => self.main_activity,
            LessonSection::Practice => self.practice,
            LessonSection::Assessment => self.assessment,
            LessonSection::Conclusion => self.conclusion,
        }
    }

    pub fn sum(&self) -> u32 {
        LessonSection::ALL.iter().map(|section| self.minutes(*section)).sum()
    }

    pub fn as_map(&self) -> BTreeMap<LessonSection, u32> {
        LessonSection::ALL.iter().map(|section| (*section, self.minutes(*section))).collect()
    }
}
