use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Record;

pub const COLUMNS: [&str; 8] = [
    "Student_ID",
    "Teacher_Name",
    "Section",
    "Performance_Score",
    "Late_Count",
    "Attendance_Rate",
    "Risk_Status",
    "Feedback_Rating",
];

/// One row of the persisted artifact.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Student_ID")]
    student_id: u32,
    #[serde(rename = "Teacher_Name")]
    teacher: String,
    #[serde(rename = "Section")]
    section: String,
    #[serde(rename = "Performance_Score")]
    score: u8,
    #[serde(rename = "Late_Count")]
    late_count: u32,
    #[serde(rename = "Attendance_Rate")]
    attendance: f64,
    #[serde(rename = "Risk_Status")]
    risk_status: u8,
    #[serde(rename = "Feedback_Rating")]
    feedback: u8,
}

impl From<&Record> for CsvRow {
    fn from(record: &Record) -> Self {
        CsvRow {
            student_id: record.student_id,
            teacher: record.teacher.clone(),
            section: record.section.clone(),
            score: record.score(),
            late_count: record.late_count(),
            attendance: record.attendance(),
            risk_status: u8::from(record.risk_status()),
            feedback: record.feedback(),
        }
    }
}

impl CsvRow {
    // Risk_Status from the file is ignored; Record::new derives it again and
    // rejects out-of-range values.
    fn into_record(self) -> Result<Record> {
        Record::new(
            self.student_id,
            self.teacher,
            self.section,
            self.score,
            self.late_count,
            self.attendance,
            self.feedback,
        )
    }
}

pub fn write_csv<W: std::io::Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    // serde only emits the header alongside the first row
    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the dataset to `path`, replacing whatever was there.
pub fn export_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, records)?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        records.push(result?.into_record()?);
    }

    Ok(records)
}

pub fn import_csv(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path)?;
    let records = read_csv(file)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
