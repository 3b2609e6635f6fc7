use serde::{Deserialize, Serialize};

/// Quadratic TEA to ATAR curve fitted per cohort. Used only to refine or
/// bound what the lookup table says.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackModel {
    pub p2: f64,
    pub p1: f64,
    pub p0: f64,
}

impl FallbackModel {
    pub fn estimate(&self, tea: f64) -> f64 {
        self.p2 * tea.powi(2) + self.p1 * tea + self.p0
    }

    /// Estimate snapped to the 0.05 ATAR grid, rounding halves upward.
    pub fn rounded_estimate(&self, tea: f64) -> f64 {
        (self.estimate(tea) * 20.0 + 0.5).floor() / 20.0
    }
}
