use super::aggregate::{self, SubjectRow};
use super::domain::{ScaledScores, SelectedSubjects, SubjectCode};
use super::rank::{self, AtarEstimate, EstimationError};
use super::scaling::{self, CurvePoint};
use crate::dataset::{ConfirmedBand, DataProvider, DatasetError, Year};
use serde::Serialize;
use std::num::NonZeroU8;
use tracing::debug;

/// Full result for one selection: TEA, ATAR and the per-subject table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    pub year: Year,
    pub tea: f64,
    pub atar: AtarEstimate,
    pub rows: Vec<SubjectRow>,
}

/// Stateless estimator bound to a data provider.
pub struct AtarEstimator<P> {
    provider: P,
}

impl<P: DataProvider> AtarEstimator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn scaled_score(
        &self,
        raw: f64,
        code: &SubjectCode,
        year: Year,
    ) -> Result<f64, DatasetError> {
        scaling::calculate_scaled_score(&self.provider, raw, code, year)
    }

    pub fn map_raw_to_scaled_scores(
        &self,
        subjects: &SelectedSubjects,
        year: Year,
    ) -> Result<ScaledScores, DatasetError> {
        aggregate::map_raw_to_scaled_scores(&self.provider, subjects, year)
    }

    pub fn tea_from_subjects(
        &self,
        subjects: &SelectedSubjects,
        year: Year,
    ) -> Result<f64, DatasetError> {
        aggregate::tea_from_subjects(&self.provider, subjects, year)
    }

    pub fn atar_from_tea(&self, tea: f64, year: Year) -> Result<AtarEstimate, EstimationError> {
        rank::calculate_atar_from_tea(&self.provider, tea, year)
    }

    pub fn estimate(
        &self,
        subjects: &SelectedSubjects,
        year: Year,
    ) -> Result<EstimateReport, EstimationError> {
        let dataset = self.provider.dataset(year)?;
        let rows = aggregate::subject_breakdown(dataset, subjects)?;
        let scaled: Vec<Option<f64>> = rows.iter().map(|row| row.scaled).collect();
        let tea = aggregate::tea_from_scaled_scores(&scaled);
        let atar = rank::atar_from_tea(tea, dataset.table(), dataset.model())?;

        debug!(
            year,
            selected = subjects.len(),
            scored = subjects.scored().count(),
            tea,
            %atar,
            "estimated ATAR"
        );

        Ok(EstimateReport {
            year,
            tea,
            atar,
            rows,
        })
    }

    pub fn scaling_curve(
        &self,
        code: &SubjectCode,
        year: Year,
        step: NonZeroU8,
    ) -> Result<Vec<CurvePoint>, DatasetError> {
        let coefficients = self.provider.coefficients(code, year)?;
        Ok(scaling::scaling_curve(coefficients, step))
    }

    pub fn confirmed_bands(&self, year: Year) -> Result<Vec<ConfirmedBand>, DatasetError> {
        Ok(self.provider.atar_data(year)?.confirmed_bands())
    }
}
