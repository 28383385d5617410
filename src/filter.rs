use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::models::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SectionFilter {
    All,
    Only(String),
}

impl SectionFilter {
    pub fn matches(&self, section: &str) -> bool {
        match self {
            SectionFilter::All => true,
            SectionFilter::Only(wanted) => wanted == section,
        }
    }
}

impl FromStr for SectionFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(SectionFilter::All)
        } else {
            Ok(SectionFilter::Only(trimmed.to_string()))
        }
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFilter::All => write!(f, "All"),
            SectionFilter::Only(section) => write!(f, "{section}"),
        }
    }
}

/// Teachers and section currently selected in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub teachers: BTreeSet<String>,
    pub section: SectionFilter,
}

impl FilterSelection {
    pub fn new<I, S>(teachers: I, section: SectionFilter) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            teachers: teachers.into_iter().map(Into::into).collect(),
            section,
        }
    }

    /// Every teacher present in `records`, all sections.
    pub fn all(records: &[Record]) -> Self {
        Self {
            teachers: records.iter().map(|r| r.teacher.clone()).collect(),
            section: SectionFilter::All,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.teachers.contains(&record.teacher) && self.section.matches(&record.section)
    }
}

/// Order-preserving sub-sequence of `records` accepted by `selection`.
///
/// Unknown teachers or sections simply match nothing.
pub fn filter(records: &[Record], selection: &FilterSelection) -> Vec<Record> {
    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect();
    debug!(
        "Filter teachers={} section={} kept {}/{} records",
        selection.teachers.len(),
        selection.section,
        filtered.len(),
        records.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "T1", "SecA", 30, 1, 80.0, 3).unwrap(),
            Record::new(2, "T2", "SecB", 70, 0, 90.0, 4).unwrap(),
            Record::new(3, "T1", "SecB", 90, 2, 85.0, 5).unwrap(),
            Record::new(4, "T3", "SecA", 55, 9, 70.0, 2).unwrap(),
        ]
    }

    #[test]
    fn all_sections_keeps_teacher_matches_in_order() {
        let ds = sample();
        let selection = FilterSelection::new(["T1"], SectionFilter::All);
        let ids: Vec<u32> = filter(&ds, &selection).iter().map(|r| r.student_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn section_constraint_narrows_further() {
        let ds = sample();
        let selection = FilterSelection::new(["T1", "T3"], "SecA".parse().unwrap());
        let ids: Vec<u32> = filter(&ds, &selection).iter().map(|r| r.student_id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn empty_teacher_set_yields_nothing() {
        let ds = sample();
        let selection = FilterSelection::new(Vec::<String>::new(), SectionFilter::All);
        assert!(filter(&ds, &selection).is_empty());
    }

    #[test]
    fn unknown_section_yields_nothing() {
        let ds = sample();
        let mut selection = FilterSelection::all(&ds);
        selection.section = SectionFilter::Only("Nowhere".to_string());
        assert!(filter(&ds, &selection).is_empty());
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let ds = sample();
        let selection = FilterSelection::new(["T1", "T2"], "SecB".parse().unwrap());
        let once = filter(&ds, &selection);
        let twice = filter(&once, &selection);
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn all_parses_case_insensitively() {
        assert_eq!("All".parse::<SectionFilter>().unwrap(), SectionFilter::All);
        assert_eq!(" all ".parse::<SectionFilter>().unwrap(), SectionFilter::All);
        assert_eq!(
            "Elite-A".parse::<SectionFilter>().unwrap(),
            SectionFilter::Only("Elite-A".to_string())
        );
    }

    #[test]
    fn default_selection_covers_every_teacher() {
        let ds = sample();
        let selection = FilterSelection::all(&ds);
        assert_eq!(selection.teachers.len(), 3);
        assert_eq!(filter(&ds, &selection), ds);
    }
}
