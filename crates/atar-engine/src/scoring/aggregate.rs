use super::domain::{RawScore, ScaledScores, Score, SelectedSubjects, SubjectCode};
use super::scaling::scaled_score;
use crate::dataset::{DataProvider, DatasetError, Year, YearDataset};
use serde::Serialize;
use std::cmp::Ordering;

/// Number of scaled scores that count towards a TEA.
pub const SUBJECTS_IN_TEA: usize = 5;

/// Scales every scored subject; unscored subjects map to `None`, never 0.
pub fn map_raw_to_scaled_scores<P: DataProvider + ?Sized>(
    provider: &P,
    subjects: &SelectedSubjects,
    year: Year,
) -> Result<ScaledScores, DatasetError> {
    scale_subjects(provider.dataset(year)?, subjects)
}

pub(crate) fn scale_subjects(
    dataset: &YearDataset,
    subjects: &SelectedSubjects,
) -> Result<ScaledScores, DatasetError> {
    let mut scaled = ScaledScores::default();
    for (code, score) in subjects.iter() {
        let value = match score {
            Score::Present(raw) => Some(scaled_score(
                f64::from(raw),
                dataset.coefficients(code)?,
            )),
            Score::Absent => None,
        };
        scaled.push(code.clone(), value);
    }
    Ok(scaled)
}

/// Sum of the five largest scaled scores, ignoring blanks; 0 when nothing is scored.
pub fn tea_from_scaled_scores(scaled: &[Option<f64>]) -> f64 {
    let mut values: Vec<f64> = scaled.iter().flatten().copied().collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values
        .iter()
        .take(SUBJECTS_IN_TEA)
        .fold(0.0, |tea, value| tea + value)
}

pub fn tea_from_subjects<P: DataProvider + ?Sized>(
    provider: &P,
    subjects: &SelectedSubjects,
    year: Year,
) -> Result<f64, DatasetError> {
    let scaled = map_raw_to_scaled_scores(provider, subjects, year)?;
    Ok(tea_from_scaled_scores(&scaled.values()))
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRow {
    pub code: SubjectCode,
    pub name: Option<String>,
    pub score: Score,
    pub scaled: Option<f64>,
    /// TEA gained by one more raw mark in this subject, all else fixed.
    pub potential: Option<f64>,
}

/// Rows ordered by scaled score, highest first. Unscored subjects come last
/// and equal scores keep their selection order.
pub fn subject_breakdown(
    dataset: &YearDataset,
    subjects: &SelectedSubjects,
) -> Result<Vec<SubjectRow>, DatasetError> {
    let scaled = scale_subjects(dataset, subjects)?;

    let mut rows: Vec<SubjectRow> = subjects
        .iter()
        .zip(scaled.iter())
        .map(|((code, score), (_, scaled))| SubjectRow {
            code: code.clone(),
            name: dataset.catalog().get(code).map(|info| info.name.clone()),
            score,
            scaled,
            potential: None,
        })
        .collect();

    rows.sort_by(|a, b| descending_scaled(a.scaled, b.scaled));

    let fifth = rows.get(SUBJECTS_IN_TEA - 1).and_then(|row| row.scaled);

    for (index, row) in rows.iter_mut().enumerate() {
        row.potential = match (row.score.raw(), row.scaled) {
            (Some(raw), Some(current)) => Some(potential(
                dataset,
                &row.code,
                raw,
                current,
                (index >= SUBJECTS_IN_TEA).then_some(fifth).flatten(),
            )?),
            _ => None,
        };
    }

    Ok(rows)
}

fn descending_scaled(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `fifth` is the current fifth-best scaled score when the subject sits
/// outside the counted five; a raised score only helps once it passes it.
fn potential(
    dataset: &YearDataset,
    code: &SubjectCode,
    raw: RawScore,
    current: f64,
    fifth: Option<f64>,
) -> Result<f64, DatasetError> {
    let Some(next) = raw.increment() else {
        return Ok(0.0);
    };
    let raised = scaled_score(f64::from(next), dataset.coefficients(code)?);

    Ok(match fifth {
        None => raised - current,
        Some(fifth) if raised < fifth => 0.0,
        Some(fifth) => raised - fifth,
    })
}
