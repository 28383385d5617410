use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::models::{Dataset, Record, FIRST_STUDENT_ID, SECTIONS, TEACHERS};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPolicy {
    /// Flat score and lateness draws, as the dashboard seeds itself
    #[default]
    Uniform,
    /// Normal scores, Poisson lateness, score-dependent feedback
    Realistic,
}

const REALISTIC_SCORE_MEAN: f64 = 72.0;
const REALISTIC_SCORE_SD: f64 = 15.0;
const REALISTIC_LATE_LAMBDA: f64 = 3.0;

/// Upper bound on a single generation request.
pub const MAX_RECORDS: i64 = 1_000_000;

/// Produce `count` records from `seed`. The same triple always yields the
/// same dataset.
pub fn generate(count: i64, seed: u64, policy: GenerationPolicy) -> Result<Dataset> {
    let count = checked_count(count)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let records = generate_with(&mut rng, count, policy)?;
    info!(
        "Generated {} records (seed={seed}, policy={policy:?})",
        records.len()
    );
    Ok(Arc::new(records))
}

/// Validate a requested record count against `0..=MAX_RECORDS`.
pub fn checked_count(count: i64) -> Result<usize> {
    if !(0..=MAX_RECORDS).contains(&count) {
        return Err(DashboardError::InvalidArgument(format!(
            "record count must be within 0..={MAX_RECORDS}, got {count}"
        )));
    }
    Ok(count as usize)
}

/// Draw records from a caller-supplied random source.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    policy: GenerationPolicy,
) -> Result<Vec<Record>> {
    (0..count)
        .map(|i| {
            let student_id = u32::try_from(i)
                .ok()
                .and_then(|i| FIRST_STUDENT_ID.checked_add(i))
                .ok_or_else(|| {
                    DashboardError::InvalidArgument(format!("student id overflow at record {i}"))
                })?;
            let teacher = *TEACHERS.choose(rng).unwrap_or(&TEACHERS[0]);
            let section = *SECTIONS.choose(rng).unwrap_or(&SECTIONS[0]);
            let record = match policy {
                GenerationPolicy::Uniform => {
                    let score = rng.gen_range(40..100u8);
                    let late = rng.gen_range(0..12u32);
                    let attendance = rng.gen_range(65.0..98.0);
                    let feedback = rng.gen_range(1..6u8);
                    Record::new(student_id, teacher, section, score, late, attendance, feedback)?
                }
                GenerationPolicy::Realistic => {
                    let score =
                        realistic_score(sample_normal(rng, REALISTIC_SCORE_MEAN, REALISTIC_SCORE_SD));
                    let late = sample_poisson(rng, REALISTIC_LATE_LAMBDA);
                    let attendance = round2(rng.gen_range(60.0..99.0));
                    let feedback = if score > 60 {
                        rng.gen_range(2..6u8)
                    } else {
                        rng.gen_range(1..4u8)
                    };
                    Record::new(student_id, teacher, section, score, late, attendance, feedback)?
                }
            };
            debug!(
                "record {} -> {} / {} score={} late={} risk={}",
                record.student_id,
                record.teacher,
                record.section,
                record.score(),
                record.late_count(),
                record.risk_status()
            );
            Ok(record)
        })
        .collect()
}

/// Round a normal draw to a whole score and clamp it into 0..=100.
pub fn realistic_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Normal draw via the Box-Muller transform.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Poisson draw using Knuth's multiplication method; fine for small lambda.
pub fn sample_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        p *= rng.gen::<f64>();
        if p <= limit {
            return k;
        }
        k += 1;
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
