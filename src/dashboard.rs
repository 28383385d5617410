use log::debug;
use serde::Serialize;

use crate::aggregate::Aggregation;
use crate::error::DashboardError;
use crate::filter::{filter, FilterSelection};
use crate::models::{HeatmapMatrix, Record, SunburstNode, TeacherProfile, TeacherScore};
use crate::session::Session;
use crate::style::{cell_style, StyleTag};

/// Shown on the "Staff Stability" card. Not derived from any record.
pub const STAFF_STABILITY_PLACEHOLDER: f64 = 92.4;

pub const COMPETENCY_AXES: [&str; 5] = ["Instruction", "Admin", "Feedback", "Engagement", "Innovation"];
/// Fixed radar values, identical for every teacher.
pub const COMPETENCY_PLACEHOLDER: [u8; 5] = [8, 7, 9, 6, 8];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub avg_performance: Option<f64>,
    pub staff_stability: f64,
    pub late_incidents: u64,
    pub at_risk_students: usize,
    pub avg_attendance: Option<f64>,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetencyRadar {
    pub axes: Vec<String>,
    pub values: Vec<u8>,
    pub range: (u8, u8),
}

impl CompetencyRadar {
    pub fn placeholder() -> Self {
        Self {
            axes: COMPETENCY_AXES.iter().map(|a| a.to_string()).collect(),
            values: COMPETENCY_PLACEHOLDER.to_vec(),
            range: (0, 10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfilePanel {
    Ready(TeacherProfile),
    /// The requested teacher has no rows under the current filter
    Missing { teacher: String, message: String },
    /// Nothing to pick from
    Empty,
}

/// Registry row restricted to the displayed columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryRow {
    pub teacher: String,
    pub section: String,
    pub score: u8,
    pub late_count: u32,
    pub risk_status: bool,
    pub style: StyleTag,
}

impl From<&Record> for RegistryRow {
    fn from(record: &Record) -> Self {
        RegistryRow {
            teacher: record.teacher.clone(),
            section: record.section.clone(),
            score: record.score(),
            late_count: record.late_count(),
            risk_status: record.risk_status(),
            style: cell_style(record.risk_status()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub kpis: Kpis,
    pub teacher_ranking: Vec<TeacherScore>,
    pub hierarchy: Vec<SunburstNode>,
    pub teachers: Vec<String>,
    pub profile: ProfilePanel,
    pub competency: CompetencyRadar,
    pub late_heatmap: HeatmapMatrix,
    pub registry: Vec<RegistryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Login,
    Dashboard(Box<DashboardView>),
}

/// One full recomputation pass for the current interaction.
///
/// Without access only the login screen is produced and the dataset is not
/// touched.
pub fn render(
    session: &Session,
    dataset: &[Record],
    selection: &FilterSelection,
    focus_teacher: Option<&str>,
) -> Screen {
    if !session.has_access() {
        return Screen::Login;
    }
    Screen::Dashboard(Box::new(build_view(dataset, selection, focus_teacher)))
}

pub fn build_view(
    dataset: &[Record],
    selection: &FilterSelection,
    focus_teacher: Option<&str>,
) -> DashboardView {
    let filtered = filter(dataset, selection);
    let agg = Aggregation::new(&filtered);
    let teachers = agg.distinct_teachers();

    let focus = focus_teacher.map(str::to_string).or_else(|| teachers.first().cloned());
    let profile = match focus {
        None => ProfilePanel::Empty,
        Some(teacher) => match agg.individual_profile(&teacher) {
            Ok(profile) => ProfilePanel::Ready(profile),
            Err(DashboardError::NotFound(message)) => ProfilePanel::Missing { teacher, message },
            Err(other) => ProfilePanel::Missing {
                teacher,
                message: other.to_string(),
            },
        },
    };

    debug!(
        "Built dashboard view over {} filtered records ({} teachers)",
        agg.len(),
        teachers.len()
    );

    DashboardView {
        selection: selection.clone(),
        kpis: Kpis {
            avg_performance: agg.mean_score(),
            staff_stability: STAFF_STABILITY_PLACEHOLDER,
            late_incidents: agg.sum_late_count(),
            at_risk_students: agg.count_at_risk(),
            avg_attendance: agg.mean_attendance(),
            record_count: agg.len(),
        },
        teacher_ranking: agg.teacher_ranking(),
        hierarchy: agg.sunburst(),
        teachers,
        profile,
        competency: CompetencyRadar::placeholder(),
        late_heatmap: agg.heatmap(),
        registry: filtered.iter().map(RegistryRow::from).collect(),
    }
}
