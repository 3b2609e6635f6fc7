//! Raw score scaling, TEA aggregation and ATAR estimation.

pub mod aggregate;
pub mod domain;
pub mod engine;
pub mod import;
pub mod rank;
pub mod scaling;

#[cfg(test)]
mod tests;

pub use aggregate::{
    map_raw_to_scaled_scores, subject_breakdown, tea_from_scaled_scores, tea_from_subjects,
    SubjectRow, SUBJECTS_IN_TEA,
};
pub use domain::{RawScore, ScaledScores, Score, ScoreError, SelectedSubjects, SubjectCode};
pub use engine::{AtarEstimator, EstimateReport};
pub use import::{parse_score_sheet, read_score_sheet, ImportError};
pub use rank::{atar_from_tea, calculate_atar_from_tea, AtarEstimate, EstimationError};
pub use scaling::{calculate_scaled_score, scaled_score, scaling_curve, CurvePoint};
