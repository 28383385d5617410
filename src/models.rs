use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{DashboardError, Result};

pub const TEACHERS: [&str; 5] = [
    "Dr. Ananya Rao",
    "Prof. Sameer Khan",
    "Ms. Clara Oswald",
    "Mr. David Miller",
    "Dr. Sunita Gupta",
];

pub const SECTIONS: [&str; 3] = ["Elite-A", "Mainstream-B", "Foundational-C"];

/// First id handed out to a generated record; ids follow array position.
pub const FIRST_STUDENT_ID: u32 = 1001;

pub const RISK_SCORE_FLOOR: u8 = 50;
pub const RISK_LATE_CEILING: u32 = 8;

/// Attrition rule shared by every constructor and setter on [`Record`].
pub fn is_at_risk(score: u8, late_count: u32) -> bool {
    score < RISK_SCORE_FLOOR || late_count > RISK_LATE_CEILING
}

pub const SCORE_RANGE: RangeInclusive<u8> = 0..=100;
pub const FEEDBACK_RANGE: RangeInclusive<u8> = 1..=5;
pub const ATTENDANCE_RANGE: RangeInclusive<f64> = 60.0..=99.0;

/// One student observation.
///
/// Every field is checked on construction and `risk_status` is derived from
/// `score` and `late_count`, so the measured fields are private and only
/// change through validating setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub student_id: u32,
    pub teacher: String,
    pub section: String,
    score: u8,
    late_count: u32,
    attendance: f64,
    risk_status: bool,
    feedback: u8,
}

impl Record {
    pub fn new(
        student_id: u32,
        teacher: impl Into<String>,
        section: impl Into<String>,
        score: u8,
        late_count: u32,
        attendance: f64,
        feedback: u8,
    ) -> Result<Self> {
        check_score(student_id, score)?;
        if !FEEDBACK_RANGE.contains(&feedback) {
            return Err(DashboardError::InvalidArgument(format!(
                "student {student_id}: feedback {feedback} outside 1..=5"
            )));
        }
        if !attendance.is_finite() || !ATTENDANCE_RANGE.contains(&attendance) {
            return Err(DashboardError::InvalidArgument(format!(
                "student {student_id}: attendance {attendance} outside 60..=99"
            )));
        }

        Ok(Self {
            student_id,
            teacher: teacher.into(),
            section: section.into(),
            score,
            late_count,
            attendance,
            risk_status: is_at_risk(score, late_count),
            feedback,
        })
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn late_count(&self) -> u32 {
        self.late_count
    }

    pub fn attendance(&self) -> f64 {
        self.attendance
    }

    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    pub fn risk_status(&self) -> bool {
        self.risk_status
    }

    /// Leaves the record untouched when `score` is out of range.
    pub fn set_score(&mut self, score: u8) -> Result<()> {
        check_score(self.student_id, score)?;
        self.score = score;
        self.risk_status = is_at_risk(self.score, self.late_count);
        Ok(())
    }

    pub fn set_late_count(&mut self, late_count: u32) {
        self.late_count = late_count;
        self.risk_status = is_at_risk(self.score, self.late_count);
    }
}

fn check_score(student_id: u32, score: u8) -> Result<()> {
    if SCORE_RANGE.contains(&score) {
        Ok(())
    } else {
        Err(DashboardError::InvalidArgument(format!(
            "student {student_id}: score {score} outside 0..=100"
        )))
    }
}

/// Generated or loaded table, shared read-only for the rest of the session.
pub type Dataset = Arc<Vec<Record>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherProfile {
    pub teacher: String,
    pub record_count: usize,
    pub mean_score: f64,
    pub mean_late_count: f64,
    pub mean_feedback: f64,
}

impl TeacherProfile {
    /// Whole stars shown for the satisfaction rating (mean feedback, truncated).
    pub fn satisfaction_stars(&self) -> u8 {
        self.mean_feedback.clamp(0.0, 5.0).floor() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherScore {
    pub teacher: String,
    pub mean_score: f64,
}

/// Dense teacher x section matrix of mean late counts; `None` marks a cell
/// with no observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub teachers: Vec<String>,
    pub sections: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl HeatmapMatrix {
    pub fn cell(&self, teacher: &str, section: &str) -> Option<f64> {
        let row = self.teachers.iter().position(|t| t == teacher)?;
        let col = self.sections.iter().position(|s| s == section)?;
        self.cells.get(row)?.get(col).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstNode {
    pub label: String,
    pub value: u64,
    pub children: Vec<SunburstNode>,
}
