use std::collections::{BTreeMap, BTreeSet};

use crate::error::{DashboardError, Result};
use crate::models::{HeatmapMatrix, Record, SunburstNode, TeacherProfile, TeacherScore};

/// Summary metrics over an already-filtered slice of records.
///
/// Nothing is cached: every call walks the slice again.
pub struct Aggregation<'a> {
    records: &'a [Record],
}

impl<'a> Aggregation<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `None` when there is nothing to average.
    pub fn mean_score(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.score() as f64))
    }

    pub fn mean_attendance(&self) -> Option<f64> {
        mean(self.records.iter().map(|r| r.attendance()))
    }

    pub fn sum_late_count(&self) -> u64 {
        self.records.iter().map(|r| r.late_count() as u64).sum()
    }

    pub fn count_at_risk(&self) -> usize {
        self.records.iter().filter(|r| r.risk_status()).count()
    }

    /// Teachers in order of first appearance.
    pub fn distinct_teachers(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.teacher.as_str()))
            .map(|r| r.teacher.clone())
            .collect()
    }

    pub fn group_by_teacher_mean_score(&self) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, (u64, usize)> = BTreeMap::new();
        for record in self.records {
            let entry = totals.entry(record.teacher.clone()).or_insert((0, 0));
            entry.0 += record.score() as u64;
            entry.1 += 1;
        }

        totals
            .into_iter()
            .map(|(teacher, (total, count))| (teacher, total as f64 / count as f64))
            .collect()
    }

    /// Teacher means sorted best first, ties broken by name.
    pub fn teacher_ranking(&self) -> Vec<TeacherScore> {
        let mut ranking: Vec<TeacherScore> = self
            .group_by_teacher_mean_score()
            .into_iter()
            .map(|(teacher, mean_score)| TeacherScore {
                teacher,
                mean_score,
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.mean_score
                .partial_cmp(&a.mean_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.teacher.cmp(&b.teacher))
        });
        ranking
    }

    /// Mean late count per (teacher, section). Pairs without observations are
    /// absent rather than zero.
    pub fn pivot_late_by_teacher_section(&self) -> BTreeMap<(String, String), f64> {
        let mut totals: BTreeMap<(String, String), (u64, usize)> = BTreeMap::new();
        for record in self.records {
            let key = (record.teacher.clone(), record.section.clone());
            let entry = totals.entry(key).or_insert((0, 0));
            entry.0 += record.late_count() as u64;
            entry.1 += 1;
        }

        totals
            .into_iter()
            .map(|(key, (total, count))| (key, total as f64 / count as f64))
            .collect()
    }

    pub fn heatmap(&self) -> HeatmapMatrix {
        let pivot = self.pivot_late_by_teacher_section();
        let teachers: Vec<String> = pivot
            .keys()
            .map(|(t, _)| t.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sections: Vec<String> = pivot
            .keys()
            .map(|(_, s)| s.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = teachers
            .iter()
            .map(|teacher| {
                sections
                    .iter()
                    .map(|section| pivot.get(&(teacher.clone(), section.clone())).copied())
                    .collect()
            })
            .collect();

        HeatmapMatrix {
            teachers,
            sections,
            cells,
        }
    }

    /// Section -> teacher hierarchy weighted by summed score.
    pub fn sunburst(&self) -> Vec<SunburstNode> {
        let mut tree: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        for record in self.records {
            *tree
                .entry(record.section.as_str())
                .or_default()
                .entry(record.teacher.as_str())
                .or_insert(0) += record.score() as u64;
        }

        tree.into_iter()
            .map(|(section, teachers)| {
                let children: Vec<SunburstNode> = teachers
                    .into_iter()
                    .map(|(teacher, value)| SunburstNode {
                        label: teacher.to_string(),
                        value,
                        children: Vec::new(),
                    })
                    .collect();
                SunburstNode {
                    label: section.to_string(),
                    value: children.iter().map(|c| c.value).sum(),
                    children,
                }
            })
            .collect()
    }

    pub fn individual_profile(&self, teacher: &str) -> Result<TeacherProfile> {
        let own: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.teacher == teacher)
            .collect();

        if own.is_empty() {
            return Err(DashboardError::NotFound(format!(
                "teacher '{teacher}' has no records in the current filter"
            )));
        }

        let n = own.len() as f64;
        Ok(TeacherProfile {
            teacher: teacher.to_string(),
            record_count: own.len(),
            mean_score: own.iter().map(|r| r.score() as f64).sum::<f64>() / n,
            mean_late_count: own.iter().map(|r| r.late_count() as f64).sum::<f64>() / n,
            mean_feedback: own.iter().map(|r| r.feedback() as f64).sum::<f64>() / n,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (total, count) = values.fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, FilterSelection, SectionFilter};

    fn scenario() -> Vec<Record> {
        vec![
            Record::new(1001, "T1", "SecA", 30, 1, 80.0, 2).unwrap(),
            Record::new(1002, "T1", "SecA", 90, 2, 95.0, 5).unwrap(),
            Record::new(1003, "T2", "SecB", 45, 9, 70.0, 1).unwrap(),
        ]
    }

    #[test]
    fn scenario_risk_filter_and_mean() {
        let ds = scenario();
        let risks: Vec<bool> = ds.iter().map(|r| r.risk_status()).collect();
        assert_eq!(risks, vec![true, false, true]);

        let selection = FilterSelection::new(["T1"], SectionFilter::All);
        let t1 = filter(&ds, &selection);
        assert_eq!(t1, ds[..2].to_vec());
        assert_eq!(Aggregation::new(&t1).mean_score(), Some(60.0));

        assert_eq!(Aggregation::new(&ds).count_at_risk(), 2);
    }

    #[test]
    fn empty_slice_has_no_mean() {
        let agg = Aggregation::new(&[]);
        assert_eq!(agg.mean_score(), None);
        assert_eq!(agg.mean_attendance(), None);
        assert_eq!(agg.sum_late_count(), 0);
        assert_eq!(agg.count_at_risk(), 0);
        assert!(agg.group_by_teacher_mean_score().is_empty());
        assert!(agg.heatmap().cells.is_empty());
    }

    #[test]
    fn reductions_over_scenario() {
        let ds = scenario();
        let agg = Aggregation::new(&ds);
        assert_eq!(agg.sum_late_count(), 12);
        let attendance = agg.mean_attendance().unwrap();
        assert!((attendance - 81.666_666).abs() < 1e-3);
    }

    #[test]
    fn group_by_teacher_has_one_entry_per_teacher() {
        let ds = scenario();
        let means = Aggregation::new(&ds).group_by_teacher_mean_score();
        assert_eq!(means.len(), 2);
        assert_eq!(means["T1"], 60.0);
        assert_eq!(means["T2"], 45.0);
    }

    #[test]
    fn ranking_is_best_first() {
        let ds = scenario();
        let ranking = Aggregation::new(&ds).teacher_ranking();
        let names: Vec<&str> = ranking.iter().map(|t| t.teacher.as_str()).collect();
        assert_eq!(names, vec!["T1", "T2"]);
    }

    #[test]
    fn pivot_omits_unobserved_cells() {
        let ds = scenario();
        let agg = Aggregation::new(&ds);
        let pivot = agg.pivot_late_by_teacher_section();
        assert_eq!(pivot.len(), 2);
        assert_eq!(pivot[&("T1".to_string(), "SecA".to_string())], 1.5);
        assert!(!pivot.contains_key(&("T1".to_string(), "SecB".to_string())));

        let heat = agg.heatmap();
        assert_eq!(heat.teachers, vec!["T1", "T2"]);
        assert_eq!(heat.sections, vec!["SecA", "SecB"]);
        assert_eq!(heat.cell("T1", "SecA"), Some(1.5));
        assert_eq!(heat.cell("T1", "SecB"), None);
        assert_eq!(heat.cell("T2", "SecB"), Some(9.0));
    }

    #[test]
    fn sunburst_sums_scores_per_section() {
        let ds = scenario();
        let nodes = Aggregation::new(&ds).sunburst();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].label, "SecA");
        assert_eq!(nodes[0].value, 120);
        assert_eq!(nodes[0].children.len(), 1);
        assert_eq!(nodes[1].value, 45);
    }

    #[test]
    fn profile_averages_one_teacher() {
        let ds = scenario();
        let profile = Aggregation::new(&ds).individual_profile("T1").unwrap();
        assert_eq!(profile.record_count, 2);
        assert_eq!(profile.mean_score, 60.0);
        assert_eq!(profile.mean_late_count, 1.5);
        assert_eq!(profile.mean_feedback, 3.5);
        assert_eq!(profile.satisfaction_stars(), 3);
    }

    #[test]
    fn profile_for_absent_teacher_is_not_found() {
        let ds = scenario();
        let err = Aggregation::new(&ds).individual_profile("Ghost").unwrap_err();
        assert!(matches!(err, DashboardError::NotFound(_)));
    }

    #[test]
    fn distinct_teachers_keep_first_appearance_order() {
        let mut ds = scenario();
        ds.push(Record::new(1004, "T0", "SecC", 70, 0, 88.0, 4).unwrap());
        ds.push(Record::new(1005, "T1", "SecC", 70, 0, 88.0, 4).unwrap());
        assert_eq!(Aggregation::new(&ds).distinct_teachers(), vec!["T1", "T2", "T0"]);
    }
}
