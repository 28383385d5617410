use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::dashboard::{DashboardView, ProfilePanel};
use crate::models::TeacherProfile;

const NO_DATA: &str = "—";

fn pct_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.1}%"))
}

fn stars(profile: &TeacherProfile) -> String {
    "★".repeat(profile.satisfaction_stars() as usize)
}

pub fn build_report(view: &DashboardView, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();
    let teacher_label = if view.selection.teachers.is_empty() {
        "no teachers".to_string()
    } else {
        format!("{} teacher(s)", view.selection.teachers.len())
    };

    let _ = writeln!(output, "# Academic Performance Intelligence");
    let _ = writeln!(
        output,
        "Generated {} for {}, section {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        teacher_label,
        view.selection.section
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Global Overview");
    let _ = writeln!(
        output,
        "- Avg Performance: {}",
        pct_or_placeholder(view.kpis.avg_performance)
    );
    let _ = writeln!(output, "- Staff Stability: {:.1}%", view.kpis.staff_stability);
    let _ = writeln!(output, "- Late Incidents: {}", view.kpis.late_incidents);
    let _ = writeln!(output, "- At-Risk Students: {}", view.kpis.at_risk_students);

    let _ = writeln!(output);
    let _ = writeln!(output, "### Teacher Performance Rank");
    if view.teacher_ranking.is_empty() {
        let _ = writeln!(output, "No data for this selection.");
    } else {
        for (i, entry) in view.teacher_ranking.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} {:.1}",
                i + 1,
                entry.teacher,
                entry.mean_score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### Institutional Hierarchy Distribution");
    if view.hierarchy.is_empty() {
        let _ = writeln!(output, "No data for this selection.");
    } else {
        for section in &view.hierarchy {
            let _ = writeln!(output, "- {} ({})", section.label, section.value);
            for teacher in &section.children {
                let _ = writeln!(output, "  - {} ({})", teacher.label, teacher.value);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Faculty Deep-Dive");
    match &view.profile {
        ProfilePanel::Ready(profile) => {
            let _ = writeln!(output, "### Profile Analysis: {}", profile.teacher);
            let _ = writeln!(output, "- Avg Score: {:.1}", profile.mean_score);
            let _ = writeln!(output, "- Avg Late: {:.1}", profile.mean_late_count);
            let _ = writeln!(output, "- Satisfaction: {}", stars(profile));
        }
        ProfilePanel::Missing { teacher, .. } => {
            let _ = writeln!(output, "No records for {teacher} under the current filter.");
        }
        ProfilePanel::Empty => {
            let _ = writeln!(output, "No faculty to analyse.");
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Competency Matrix:");
    for (axis, value) in view.competency.axes.iter().zip(&view.competency.values) {
        let _ = writeln!(output, "- {axis}: {value}/{}", view.competency.range.1);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance & Risk");
    let _ = writeln!(output, "### Late Incident Intensity");
    let heat = &view.late_heatmap;
    if heat.teachers.is_empty() {
        let _ = writeln!(output, "No data for this selection.");
    } else {
        let _ = writeln!(output, "| Teacher | {} |", heat.sections.join(" | "));
        let _ = writeln!(output, "|---|{}", "---|".repeat(heat.sections.len()));
        for (teacher, row) in heat.teachers.iter().zip(&heat.cells) {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.2}")))
                .collect();
            let _ = writeln!(output, "| {} | {} |", teacher, cells.join(" | "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### Detailed Risk Registry");
    if view.registry.is_empty() {
        let _ = writeln!(output, "No records for this selection.");
    } else {
        let _ = writeln!(output, "| Teacher | Section | Score | Late_Count | Risk_Status |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for row in &view.registry {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                row.teacher,
                row.section,
                row.score,
                row.late_count,
                if row.risk_status { "AT RISK" } else { "ok" }
            );
        }
    }

    output
}
