use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier wrapper for a subject within one cohort's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCode(pub String);

impl SubjectCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Logistic scaling parameters: `b` is the raw score that scales to 50 and
/// `a` sets the steepness of the curve around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingCoefficients {
    pub a: f64,
    pub b: f64,
}

const ACCELERATED_SUFFIX: &str = "[Accelerated]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectInfo {
    pub name: String,
    pub coefficients: ScalingCoefficients,
}

impl SubjectInfo {
    /// Accelerated entries cover subjects sat a year early; their
    /// coefficients are taken from the previous cohort's scaling.
    pub fn is_accelerated(&self) -> bool {
        self.name.trim_end().ends_with(ACCELERATED_SUFFIX)
    }
}

/// Subjects offered to one cohort, keyed by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectCatalog {
    subjects: BTreeMap<SubjectCode, SubjectInfo>,
}

impl SubjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: SubjectCode, info: SubjectInfo) -> Option<SubjectInfo> {
        self.subjects.insert(code, info)
    }

    pub fn get(&self, code: &SubjectCode) -> Option<&SubjectInfo> {
        self.subjects.get(code)
    }

    pub fn contains(&self, code: &SubjectCode) -> bool {
        self.subjects.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &SubjectCode> {
        self.subjects.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectCode, &SubjectInfo)> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl FromIterator<(SubjectCode, SubjectInfo)> for SubjectCatalog {
    fn from_iter<I: IntoIterator<Item = (SubjectCode, SubjectInfo)>>(iter: I) -> Self {
        Self {
            subjects: iter.into_iter().collect(),
        }
    }
}
