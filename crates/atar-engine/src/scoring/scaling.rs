use crate::dataset::{DataProvider, DatasetError, ScalingCoefficients, SubjectCode, Year};
use serde::Serialize;
use std::num::NonZeroU8;

/// Logistic transform `100 / (1 + e^(-a(raw - b)))`. Inputs are not clamped.
pub fn scaled_score(raw: f64, coefficients: ScalingCoefficients) -> f64 {
    let ScalingCoefficients { a, b } = coefficients;
    100.0 / (1.0 + (-a * (raw - b)).exp())
}

/// Scales one raw result with the subject's coefficients for `year`.
pub fn calculate_scaled_score<P: DataProvider + ?Sized>(
    provider: &P,
    raw: f64,
    code: &SubjectCode,
    year: Year,
) -> Result<f64, DatasetError> {
    let coefficients = provider.coefficients(code, year)?;
    Ok(scaled_score(raw, coefficients))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub raw: u8,
    pub scaled: f64,
}

/// Samples a subject's scaling curve from 0 to 100 every `step` marks. The
/// final mark is always included.
pub fn scaling_curve(coefficients: ScalingCoefficients, step: NonZeroU8) -> Vec<CurvePoint> {
    let mut raws: Vec<u8> = (0..=100).step_by(usize::from(step.get())).collect();
    if raws.last() != Some(&100) {
        raws.push(100);
    }

    raws.into_iter()
        .map(|raw| CurvePoint {
            raw,
            scaled: scaled_score(f64::from(raw), coefficients),
        })
        .collect()
}
