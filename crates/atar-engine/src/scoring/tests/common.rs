use crate::dataset::{
    DatasetRegistry, FallbackModel, RankLookupTable, RankPoint, ScalingCoefficients,
    SubjectCatalog, SubjectCode, SubjectInfo, Year, YearDataset,
};
use crate::scoring::domain::{RawScore, Score, SelectedSubjects};

pub(super) const YEAR: Year = 2022;

/// Every fixture subject shares a steepness of 0.1 so scaled scores order by
/// `raw - b`.
pub(super) const STEEPNESS: f64 = 0.1;

pub(super) fn coefficients(b: f64) -> ScalingCoefficients {
    ScalingCoefficients { a: STEEPNESS, b }
}

pub(super) fn catalog() -> SubjectCatalog {
    [
        ("ENG", "English", 50.0),
        ("MAM", "Mathematical Methods", 55.0),
        ("SPM", "Specialist Mathematics", 45.0),
        ("BIO", "Biology", 65.0),
        ("CHM", "Chemistry", 60.0),
        ("DIT", "Digital Solutions", 60.0),
        ("PHY", "Physics", 59.5),
        ("LEG", "Legal Studies", 75.0),
        ("ECO", "Economics", 70.0),
    ]
    .into_iter()
    .map(|(code, name, b)| {
        (
            SubjectCode::from(code),
            SubjectInfo {
                name: name.to_string(),
                coefficients: coefficients(b),
            },
        )
    })
    .collect()
}

pub(super) fn point(tea: f64, atar: f64) -> RankPoint {
    RankPoint { tea, atar }
}

/// Thresholds chosen to exercise every bracket shape: an exact pair at 60,
/// wide gaps, a narrow 0.3 gap and a ceiling pair.
pub(super) fn table() -> RankLookupTable {
    RankLookupTable::new(vec![
        point(200.0, 50.0),
        point(250.0, 60.0),
        point(260.0, 60.0),
        point(300.0, 70.0),
        point(301.0, 70.3),
        point(350.0, 80.0),
        point(400.0, 99.95),
        point(410.0, 99.95),
    ])
    .expect("fixture table is valid")
}

/// ATAR = TEA / 4, so refinements are easy to predict.
pub(super) fn quarter_model() -> FallbackModel {
    FallbackModel {
        p2: 0.0,
        p1: 0.25,
        p0: 0.0,
    }
}

pub(super) fn dataset_with_model(model: FallbackModel) -> YearDataset {
    YearDataset::new(YEAR, catalog(), table(), model)
}

pub(super) fn dataset() -> YearDataset {
    dataset_with_model(quarter_model())
}

pub(super) fn registry() -> DatasetRegistry {
    [dataset()].into_iter().collect()
}

pub(super) fn raw(value: u8) -> RawScore {
    RawScore::new(value).expect("fixture score within range")
}

pub(super) fn selection(entries: &[(&str, Option<u8>)]) -> SelectedSubjects {
    entries
        .iter()
        .map(|(code, score)| (SubjectCode::from(*code), Score::from(score.map(raw))))
        .collect()
}
