use crate::dataset::SubjectCatalog;
pub use crate::dataset::SubjectCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("raw score {value} is outside 0-100")]
    OutOfRange { value: i64 },
    #[error("'{input}' is not a raw score")]
    Unparsable { input: String },
}

/// Whole-number result entered for a subject, always within 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RawScore(u8);

impl RawScore {
    pub const MAX: RawScore = RawScore(100);

    pub fn new(value: u8) -> Result<Self, ScoreError> {
        if value > Self::MAX.0 {
            return Err(ScoreError::OutOfRange {
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The next mark up, or `None` at 100.
    pub fn increment(self) -> Option<Self> {
        (self < Self::MAX).then(|| Self(self.0 + 1))
    }

    /// Interprets free-form input the way the score entry form does: blank
    /// clears the score, numbers round to the nearest mark (halves up),
    /// negative marks lose their sign and anything above 100 is refused.
    pub fn normalize_input(input: &str) -> Result<Score, ScoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Score::Absent);
        }

        let parsed = trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ScoreError::Unparsable {
                input: trimmed.to_string(),
            })?;

        let rounded = (parsed + 0.5).floor().abs();
        if rounded > f64::from(Self::MAX.0) {
            return Err(ScoreError::OutOfRange {
                value: rounded.min(i64::MAX as f64) as i64,
            });
        }

        Ok(Score::Present(Self(rounded as u8)))
    }
}

impl TryFrom<u8> for RawScore {
    type Error = ScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RawScore> for u8 {
    fn from(value: RawScore) -> Self {
        value.0
    }
}

impl From<RawScore> for f64 {
    fn from(value: RawScore) -> Self {
        f64::from(value.0)
    }
}

impl fmt::Display for RawScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A selected subject's result. `Absent` means selected but not yet scored
/// (or cleared); it never contributes to a TEA and is distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    Present(RawScore),
    #[default]
    Absent,
}

impl Score {
    pub fn raw(self) -> Option<RawScore> {
        match self {
            Score::Present(raw) => Some(raw),
            Score::Absent => None,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Score::Present(_))
    }
}

impl From<Option<RawScore>> for Score {
    fn from(value: Option<RawScore>) -> Self {
        value.map_or(Score::Absent, Score::Present)
    }
}

impl From<RawScore> for Score {
    fn from(value: RawScore) -> Self {
        Score::Present(value)
    }
}

/// Subjects a student has picked for one cohort, in the order they were added.
/// Removing a subject's score keeps the entry as [`Score::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedSubjects {
    entries: Vec<(SubjectCode, Score)>,
}

impl SelectedSubjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unscored entry; returns `false` if the subject was already selected.
    pub fn add(&mut self, code: SubjectCode) -> bool {
        if self.position(&code).is_some() {
            return false;
        }
        self.entries.push((code, Score::Absent));
        true
    }

    /// Records a score, selecting the subject first if needed.
    pub fn set_score(&mut self, code: SubjectCode, score: Score) {
        match self.position(&code) {
            Some(index) => self.entries[index].1 = score,
            None => self.entries.push((code, score)),
        }
    }

    /// Marks the subject as unscored without forgetting that it was selected.
    pub fn clear(&mut self, code: &SubjectCode) -> bool {
        match self.position(code) {
            Some(index) => {
                self.entries[index].1 = Score::Absent;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, code: &SubjectCode) -> Option<Score> {
        self.position(code).map(|index| self.entries[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectCode, Score)> {
        self.entries.iter().map(|(code, score)| (code, *score))
    }

    /// Only the subjects that currently carry a raw score.
    pub fn scored(&self) -> impl Iterator<Item = (&SubjectCode, RawScore)> {
        self.iter()
            .filter_map(|(code, score)| score.raw().map(|raw| (code, raw)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restricts the selection to subjects offered in another cohort, keeping
    /// order and scores. Returns the retained selection and the dropped codes.
    pub fn for_year(&self, catalog: &SubjectCatalog) -> (SelectedSubjects, Vec<SubjectCode>) {
        let mut retained = SelectedSubjects::new();
        let mut dropped = Vec::new();
        for (code, score) in &self.entries {
            if catalog.contains(code) {
                retained.entries.push((code.clone(), *score));
            } else {
                dropped.push(code.clone());
            }
        }
        (retained, dropped)
    }

    fn position(&self, code: &SubjectCode) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == code)
    }
}

impl FromIterator<(SubjectCode, Score)> for SelectedSubjects {
    fn from_iter<I: IntoIterator<Item = (SubjectCode, Score)>>(iter: I) -> Self {
        let mut subjects = SelectedSubjects::new();
        for (code, score) in iter {
            subjects.set_score(code, score);
        }
        subjects
    }
}

/// Scaled score per selected subject, `None` where no raw score was entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScaledScores {
    entries: Vec<(SubjectCode, Option<f64>)>,
}

impl ScaledScores {
    pub(crate) fn push(&mut self, code: SubjectCode, scaled: Option<f64>) {
        self.entries.push((code, scaled));
    }

    pub fn get(&self, code: &SubjectCode) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == code)
            .map(|(_, scaled)| *scaled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectCode, Option<f64>)> {
        self.entries.iter().map(|(code, scaled)| (code, *scaled))
    }

    /// Scores without their subjects, blanks included.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.entries.iter().map(|(_, scaled)| *scaled).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
