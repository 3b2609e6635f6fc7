//! Year-scoped reference data: subject catalogs with scaling coefficients,
//! TEA lookup tables and fallback curves, one immutable record per cohort.

mod catalog;
mod loader;
mod model;
mod table;

pub use catalog::{ScalingCoefficients, SubjectCatalog, SubjectCode, SubjectInfo};
pub use model::FallbackModel;
pub use table::{Bracket, ConfirmedBand, RankLookupTable, RankPoint, TableError, ATAR_CEILING};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Cohort year.
pub type Year = u16;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no dataset is available for {year}")]
    UnsupportedYear { year: Year },
    #[error("subject {code} has no scaling coefficients in {year}")]
    MissingCoefficients { code: SubjectCode, year: Year },
    #[error("subject {code} is listed for {year} but has no scaling data")]
    UnscaledSubject { code: SubjectCode, year: Year },
    #[error("scaling data for {year} covers {code}, which is not in the subject list")]
    UnlistedSubject { code: SubjectCode, year: Year },
    #[error("invalid TEA threshold '{value}' in {year} lookup table")]
    InvalidThreshold { value: String, year: Year },
    #[error("invalid {year} lookup table: {source}")]
    InvalidTable {
        year: Year,
        #[source]
        source: TableError,
    },
    #[error("no fallback model is defined for {year}")]
    MissingModel { year: Year },
    #[error("fallback model key '{value}' is not a year")]
    InvalidModelYear { value: String },
    #[error("no datasets found in {}", .path.display())]
    NoDatasets { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything needed to score one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct YearDataset {
    year: Year,
    catalog: SubjectCatalog,
    table: RankLookupTable,
    model: FallbackModel,
}

impl YearDataset {
    pub fn new(
        year: Year,
        catalog: SubjectCatalog,
        table: RankLookupTable,
        model: FallbackModel,
    ) -> Self {
        Self {
            year,
            catalog,
            table,
            model,
        }
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &RankLookupTable {
        &self.table
    }

    pub fn model(&self) -> &FallbackModel {
        &self.model
    }

    pub fn coefficients(&self, code: &SubjectCode) -> Result<ScalingCoefficients, DatasetError> {
        self.catalog
            .get(code)
            .map(|info| info.coefficients)
            .ok_or_else(|| DatasetError::MissingCoefficients {
                code: code.clone(),
                year: self.year,
            })
    }
}

/// Resolves a cohort year to its reference data. Every lookup fails with
/// [`DatasetError::UnsupportedYear`] rather than substituting another year.
pub trait DataProvider {
    fn dataset(&self, year: Year) -> Result<&YearDataset, DatasetError>;

    fn subjects(&self, year: Year) -> Result<&SubjectCatalog, DatasetError> {
        Ok(self.dataset(year)?.catalog())
    }

    fn scaling_data(
        &self,
        year: Year,
    ) -> Result<Vec<(&SubjectCode, ScalingCoefficients)>, DatasetError> {
        Ok(self
            .dataset(year)?
            .catalog()
            .iter()
            .map(|(code, info)| (code, info.coefficients))
            .collect())
    }

    fn atar_data(&self, year: Year) -> Result<&RankLookupTable, DatasetError> {
        Ok(self.dataset(year)?.table())
    }

    fn estimate_atar_model(&self, tea: f64, year: Year) -> Result<f64, DatasetError> {
        Ok(self.dataset(year)?.model().estimate(tea))
    }

    fn coefficients(
        &self,
        code: &SubjectCode,
        year: Year,
    ) -> Result<ScalingCoefficients, DatasetError> {
        self.dataset(year)?.coefficients(code)
    }
}

impl<P: DataProvider + ?Sized> DataProvider for &P {
    fn dataset(&self, year: Year) -> Result<&YearDataset, DatasetError> {
        (**self).dataset(year)
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    fn dataset(&self, year: Year) -> Result<&YearDataset, DatasetError> {
        (**self).dataset(year)
    }
}

/// In-memory provider keyed by year.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<Year, YearDataset>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Datasets shipped with the crate.
    pub fn bundled() -> Result<Self, DatasetError> {
        let registry: Self = loader::load_bundled()?.into_iter().collect();
        info!(years = ?registry.years(), "loaded bundled cohort datasets");
        Ok(registry)
    }

    /// Loads every `{year}_atar_data.json` cohort found in `dir`, together with
    /// its subject list, scaling data and the shared `fallback_models.json`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let registry: Self = loader::load_dir(dir)?.into_iter().collect();
        info!(path = %dir.display(), years = ?registry.years(), "loaded cohort datasets");
        Ok(registry)
    }

    pub fn insert(&mut self, dataset: YearDataset) -> Option<YearDataset> {
        self.datasets.insert(dataset.year(), dataset)
    }

    pub fn years(&self) -> Vec<Year> {
        self.datasets.keys().copied().collect()
    }

    pub fn latest_year(&self) -> Option<Year> {
        self.datasets.keys().next_back().copied()
    }
}

impl FromIterator<YearDataset> for DatasetRegistry {
    fn from_iter<I: IntoIterator<Item = YearDataset>>(iter: I) -> Self {
        let mut registry = Self::new();
        for dataset in iter {
            registry.insert(dataset);
        }
        registry
    }
}

impl DataProvider for DatasetRegistry {
    fn dataset(&self, year: Year) -> Result<&YearDataset, DatasetError> {
        self.datasets
            .get(&year)
            .ok_or(DatasetError::UnsupportedYear { year })
    }
}
