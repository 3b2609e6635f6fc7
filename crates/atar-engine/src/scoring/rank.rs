use crate::dataset::{
    Bracket, DataProvider, DatasetError, FallbackModel, RankLookupTable, Year, ATAR_CEILING,
};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Lookup brackets wider than this are worth refining with the fallback curve.
const REFINEMENT_GAP: f64 = 0.5;

#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("TEA {tea} is not a finite number")]
    NonFiniteAggregate { tea: f64 },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// What the lookup table can say about a TEA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtarEstimate {
    /// Fallback-curve estimate, shown as `~x.xx`.
    Approximate(f64),
    /// Below the lowest observation; the ATAR is under this bound. Shown as `<x.xx`.
    Below(f64),
    /// The table pins the ATAR down exactly.
    Exact(f64),
    /// Somewhere between two observed ranks, shown as `min-max`.
    Range { min: f64, max: f64 },
    /// At or above every observation.
    Ceiling,
}

impl AtarEstimate {
    /// The closed ATAR interval this estimate stands for.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            AtarEstimate::Approximate(atar) | AtarEstimate::Exact(atar) => (atar, atar),
            AtarEstimate::Below(max) => (0.0, max),
            AtarEstimate::Range { min, max } => (min, max),
            AtarEstimate::Ceiling => (ATAR_CEILING, ATAR_CEILING),
        }
    }
}

fn rank(value: f64) -> String {
    // -0.0 + 0.0 is +0.0, so a rounded-away negative zero never prints a sign.
    format!("{:.2}", value + 0.0)
}

impl fmt::Display for AtarEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AtarEstimate::Approximate(atar) => write!(f, "~{}", rank(atar)),
            AtarEstimate::Below(max) => write!(f, "<{}", rank(max)),
            AtarEstimate::Exact(atar) => f.write_str(&rank(atar)),
            AtarEstimate::Range { min, max } => write!(f, "{}-{}", rank(min), rank(max)),
            AtarEstimate::Ceiling => f.write_str(&rank(ATAR_CEILING)),
        }
    }
}

impl Serialize for AtarEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maps a TEA onto the cohort's lookup table, refining wide or open-ended
/// brackets with the fallback curve only when the curve agrees with the table.
pub fn atar_from_tea(
    tea: f64,
    table: &RankLookupTable,
    model: &FallbackModel,
) -> Result<AtarEstimate, EstimationError> {
    if !tea.is_finite() {
        return Err(EstimationError::NonFiniteAggregate { tea });
    }

    let estimate = match table.bracket(tea) {
        Bracket::BelowRange { upper } => {
            let estimated = model.rounded_estimate(tea);
            if estimated < upper.atar {
                AtarEstimate::Approximate(estimated)
            } else {
                AtarEstimate::Below(upper.atar)
            }
        }
        Bracket::InGap { lower, upper } => {
            if lower.atar == upper.atar || lower.atar == ATAR_CEILING {
                AtarEstimate::Exact(lower.atar)
            } else {
                refine(tea, lower.atar, upper.atar, model)
            }
        }
        Bracket::AboveRange => AtarEstimate::Ceiling,
    };

    Ok(estimate)
}

fn refine(tea: f64, min: f64, max: f64, model: &FallbackModel) -> AtarEstimate {
    if max - min > REFINEMENT_GAP {
        let estimated = model.rounded_estimate(tea);
        if (min..=max).contains(&estimated) {
            return AtarEstimate::Approximate(estimated);
        }
    }
    AtarEstimate::Range { min, max }
}

pub fn calculate_atar_from_tea<P: DataProvider + ?Sized>(
    provider: &P,
    tea: f64,
    year: Year,
) -> Result<AtarEstimate, EstimationError> {
    let dataset = provider.dataset(year)?;
    atar_from_tea(tea, dataset.table(), dataset.model())
}
