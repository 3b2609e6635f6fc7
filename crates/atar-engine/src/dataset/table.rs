use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest ATAR awarded; once a cohort reaches it no finer ranking exists.
pub const ATAR_CEILING: f64 = 99.95;

/// One observed TEA to ATAR correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankPoint {
    pub tea: f64,
    pub atar: f64,
}

/// Where a TEA falls relative to the observed thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// Below the lowest threshold; `upper` is that first point.
    BelowRange { upper: RankPoint },
    /// Between two adjacent thresholds: `lower.tea <= tea < upper.tea`.
    InGap { lower: RankPoint, upper: RankPoint },
    /// At or above every known threshold.
    AboveRange,
}

/// TEA interval inside which the ATAR is exactly known, because two adjacent
/// observations share one rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedBand {
    pub lower_tea: f64,
    pub upper_tea: f64,
    pub atar: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("lookup table has no thresholds")]
    Empty,
    #[error("threshold {tea} is not a finite number")]
    NonFiniteThreshold { tea: f64 },
    #[error("threshold {tea} appears more than once")]
    DuplicateThreshold { tea: f64 },
    #[error("rank {atar} at threshold {tea} is outside 0.00-99.95")]
    RankOutOfRange { tea: f64, atar: f64 },
}

/// Sparse TEA to ATAR lookup for one cohort, sorted by ascending TEA.
#[derive(Debug, Clone, PartialEq)]
pub struct RankLookupTable {
    points: Vec<RankPoint>,
}

impl RankLookupTable {
    pub fn new(mut points: Vec<RankPoint>) -> Result<Self, TableError> {
        if points.is_empty() {
            return Err(TableError::Empty);
        }

        for point in &points {
            if !point.tea.is_finite() {
                return Err(TableError::NonFiniteThreshold { tea: point.tea });
            }
            if !(0.0..=ATAR_CEILING).contains(&point.atar) {
                return Err(TableError::RankOutOfRange {
                    tea: point.tea,
                    atar: point.atar,
                });
            }
        }

        points.sort_by(|a, b| a.tea.total_cmp(&b.tea));
        if let Some(pair) = points.windows(2).find(|pair| pair[0].tea == pair[1].tea) {
            return Err(TableError::DuplicateThreshold { tea: pair[0].tea });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[RankPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Locates the first threshold strictly greater than `tea` and its predecessor.
    pub fn bracket(&self, tea: f64) -> Bracket {
        let index = self.points.partition_point(|point| point.tea <= tea);
        match index {
            0 => Bracket::BelowRange {
                upper: self.points[0],
            },
            i if i == self.points.len() => Bracket::AboveRange,
            i => Bracket::InGap {
                lower: self.points[i - 1],
                upper: self.points[i],
            },
        }
    }

    /// Pairs of adjacent thresholds sharing a rank, matched left to right
    /// without overlap.
    pub fn confirmed_bands(&self) -> Vec<ConfirmedBand> {
        let mut bands = Vec::new();
        let mut i = 0;
        while i + 1 < self.points.len() {
            let (lower, upper) = (self.points[i], self.points[i + 1]);
            if lower.atar == upper.atar {
                bands.push(ConfirmedBand {
                    lower_tea: lower.tea,
                    upper_tea: upper.tea,
                    atar: lower.atar,
                });
                i += 2;
            } else {
                i += 1;
            }
        }
        bands
    }
}
