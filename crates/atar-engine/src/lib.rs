//! Scaling, aggregation and rank estimation for Queensland ATAR calculations.
//!
//! Raw subject results are scaled per subject and per cohort year, the best five
//! scaled scores are summed into a TEA, and the TEA is mapped onto an ATAR using
//! the cohort's published lookup table with a fitted fallback curve.

pub mod config;
pub mod dataset;
pub mod error;
pub mod scoring;
pub mod telemetry;

pub use dataset::{
    DataProvider, DatasetError, DatasetRegistry, FallbackModel, RankLookupTable,
    ScalingCoefficients, SubjectCatalog, SubjectInfo, Year, YearDataset,
};
pub use scoring::{
    AtarEstimate, AtarEstimator, EstimateReport, RawScore, Score, SelectedSubjects, SubjectCode,
};
