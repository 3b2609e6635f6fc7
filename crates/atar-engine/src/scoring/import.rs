use super::domain::{RawScore, ScoreError, SelectedSubjects, SubjectCode};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read score sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid score for {code}: {source}")]
    Score {
        code: SubjectCode,
        #[source]
        source: ScoreError,
    },
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    code: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    score: Option<String>,
}

/// Reads a `code,score` sheet. Blank scores select the subject without a
/// result; a repeated code replaces the earlier row's score.
pub fn parse_score_sheet<R: Read>(reader: R) -> Result<SelectedSubjects, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut subjects = SelectedSubjects::new();

    for record in csv_reader.deserialize::<ScoreRow>() {
        let row = record?;
        let code = SubjectCode::new(row.code);
        let score = RawScore::normalize_input(row.score.as_deref().unwrap_or_default())
            .map_err(|source| ImportError::Score {
                code: code.clone(),
                source,
            })?;
        subjects.set_score(code, score);
    }

    Ok(subjects)
}

pub fn read_score_sheet<P: AsRef<Path>>(path: P) -> Result<SelectedSubjects, ImportError> {
    let file = std::fs::File::open(path)?;
    parse_score_sheet(file)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
