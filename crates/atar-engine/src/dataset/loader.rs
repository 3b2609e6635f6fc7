use super::{
    DatasetError, FallbackModel, RankLookupTable, RankPoint, ScalingCoefficients, SubjectCatalog,
    SubjectCode, SubjectInfo, Year, YearDataset,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const MODELS_FILE: &str = "fallback_models.json";
const ATAR_SUFFIX: &str = "_atar_data.json";

struct CohortSources<'a> {
    year: Year,
    subjects: &'a str,
    scaling: &'a str,
    atar: &'a str,
}

static BUNDLED: [CohortSources<'static>; 3] = [
    CohortSources {
        year: 2020,
        subjects: include_str!("../../data/2020_subjects.json"),
        scaling: include_str!("../../data/2020_scaling_data.json"),
        atar: include_str!("../../data/2020_atar_data.json"),
    },
    CohortSources {
        year: 2021,
        subjects: include_str!("../../data/2021_subjects.json"),
        scaling: include_str!("../../data/2021_scaling_data.json"),
        atar: include_str!("../../data/2021_atar_data.json"),
    },
    CohortSources {
        year: 2022,
        subjects: include_str!("../../data/2022_subjects.json"),
        scaling: include_str!("../../data/2022_scaling_data.json"),
        atar: include_str!("../../data/2022_atar_data.json"),
    },
];

const BUNDLED_MODELS: &str = include_str!("../../data/fallback_models.json");

pub(crate) fn load_bundled() -> Result<Vec<YearDataset>, DatasetError> {
    let models = parse_models(BUNDLED_MODELS, &format!("bundled {MODELS_FILE}"))?;
    BUNDLED
        .iter()
        .map(|sources| build_dataset(sources, &models, "bundled "))
        .collect()
}

pub(crate) fn load_dir(dir: &Path) -> Result<Vec<YearDataset>, DatasetError> {
    let models_path = dir.join(MODELS_FILE);
    let models = parse_models(&read(&models_path)?, &models_path.display().to_string())?;

    let entries = fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut years = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name();
        let Some(year) = file_name
            .to_str()
            .and_then(|name| name.strip_suffix(ATAR_SUFFIX))
            .and_then(|prefix| prefix.parse::<Year>().ok())
        else {
            continue;
        };
        years.push(year);
    }

    if years.is_empty() {
        return Err(DatasetError::NoDatasets {
            path: dir.to_path_buf(),
        });
    }
    years.sort_unstable();

    let mut datasets = Vec::with_capacity(years.len());
    for year in years {
        let subjects = read(&dir.join(format!("{year}_subjects.json")))?;
        let scaling = read(&dir.join(format!("{year}_scaling_data.json")))?;
        let atar = read(&dir.join(format!("{year}{ATAR_SUFFIX}")))?;
        let sources = CohortSources {
            year,
            subjects: &subjects,
            scaling: &scaling,
            atar: &atar,
        };
        let prefix = format!("{}/", dir.display());
        datasets.push(build_dataset(&sources, &models, &prefix)?);
    }

    Ok(datasets)
}

fn read(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(raw: &str, origin: &str) -> Result<T, DatasetError> {
    serde_json::from_str(raw).map_err(|source| DatasetError::Json {
        origin: origin.to_string(),
        source,
    })
}

fn parse_models(raw: &str, origin: &str) -> Result<BTreeMap<Year, FallbackModel>, DatasetError> {
    let keyed: BTreeMap<String, FallbackModel> = parse_json(raw, origin)?;
    keyed
        .into_iter()
        .map(|(key, model)| {
            key.trim()
                .parse::<Year>()
                .map(|year| (year, model))
                .map_err(|_| DatasetError::InvalidModelYear { value: key })
        })
        .collect()
}

fn build_dataset(
    sources: &CohortSources<'_>,
    models: &BTreeMap<Year, FallbackModel>,
    origin_prefix: &str,
) -> Result<YearDataset, DatasetError> {
    let year = sources.year;
    let names: BTreeMap<String, String> = parse_json(
        sources.subjects,
        &format!("{origin_prefix}{year}_subjects.json"),
    )?;
    let mut scaling: BTreeMap<String, ScalingCoefficients> = parse_json(
        sources.scaling,
        &format!("{origin_prefix}{year}_scaling_data.json"),
    )?;
    let thresholds: BTreeMap<String, f64> = parse_json(
        sources.atar,
        &format!("{origin_prefix}{year}{ATAR_SUFFIX}"),
    )?;

    let mut catalog = SubjectCatalog::new();
    for (code, name) in names {
        let coefficients =
            scaling
                .remove(&code)
                .ok_or_else(|| DatasetError::UnscaledSubject {
                    code: SubjectCode::new(code.clone()),
                    year,
                })?;
        catalog.insert(SubjectCode::new(code), SubjectInfo { name, coefficients });
    }
    if let Some(code) = scaling.into_keys().next() {
        return Err(DatasetError::UnlistedSubject {
            code: SubjectCode::new(code),
            year,
        });
    }

    let points = thresholds
        .into_iter()
        .map(|(key, atar)| match key.trim().parse::<f64>() {
            Ok(tea) if tea.is_finite() => Ok(RankPoint { tea, atar }),
            _ => Err(DatasetError::InvalidThreshold { value: key, year }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let table =
        RankLookupTable::new(points).map_err(|source| DatasetError::InvalidTable { year, source })?;

    let model = models
        .get(&year)
        .copied()
        .ok_or(DatasetError::MissingModel { year })?;

    debug!(
        year,
        subjects = catalog.len(),
        thresholds = table.len(),
        "parsed cohort dataset"
    );

    Ok(YearDataset::new(year, catalog, table, model))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECTS: &str = r#"{ "ENG": "English", "MAM": "Mathematical Methods" }"#;
    const SCALING: &str =
        r#"{ "ENG": { "a": 0.087, "b": 60.2 }, "MAM": { "a": 0.095, "b": 55.3 } }"#;
    const ATAR: &str = r#"{ "310.5": 72.0, "300.25": 70.0, "305": 70.0 }"#;

    fn models() -> BTreeMap<Year, FallbackModel> {
        parse_models(r#"{ "2022": { "p2": 0.0, "p1": 0.25, "p0": 0.0 } }"#, "test")
            .expect("models parse")
    }

    fn sources<'a>(subjects: &'a str, scaling: &'a str, atar: &'a str) -> CohortSources<'a> {
        CohortSources {
            year: 2022,
            subjects,
            scaling,
            atar,
        }
    }

    #[test]
    fn builds_sorted_dataset_from_json() {
        let dataset =
            build_dataset(&sources(SUBJECTS, SCALING, ATAR), &models(), "").expect("parses");

        assert_eq!(dataset.catalog().len(), 2);
        let teas: Vec<f64> = dataset.table().points().iter().map(|p| p.tea).collect();
        assert_eq!(teas, vec![300.25, 305.0, 310.5]);
        assert_eq!(
            dataset.coefficients(&SubjectCode::from("MAM")).unwrap(),
            ScalingCoefficients { a: 0.095, b: 55.3 }
        );
    }

    #[test]
    fn subject_without_scaling_is_rejected() {
        let scaling = r#"{ "ENG": { "a": 0.087, "b": 60.2 } }"#;
        let err = build_dataset(&sources(SUBJECTS, scaling, ATAR), &models(), "")
            .expect_err("MAM lacks coefficients");
        assert!(matches!(
            err,
            DatasetError::UnscaledSubject { ref code, year: 2022 } if code.as_str() == "MAM"
        ));
    }

    #[test]
    fn scaling_without_subject_is_rejected() {
        let subjects = r#"{ "ENG": "English" }"#;
        let err = build_dataset(&sources(subjects, SCALING, ATAR), &models(), "")
            .expect_err("MAM is not listed");
        assert!(matches!(err, DatasetError::UnlistedSubject { .. }));
    }

    #[test]
    fn non_numeric_threshold_is_rejected() {
        let atar = r#"{ "three hundred": 70.0 }"#;
        let err = build_dataset(&sources(SUBJECTS, SCALING, atar), &models(), "")
            .expect_err("threshold must be numeric");
        assert!(matches!(err, DatasetError::InvalidThreshold { .. }));
    }

    #[test]
    fn duplicate_numeric_threshold_is_rejected() {
        let atar = r#"{ "300": 70.0, "300.0": 70.5 }"#;
        let err = build_dataset(&sources(SUBJECTS, SCALING, atar), &models(), "")
            .expect_err("thresholds collide");
        assert!(matches!(err, DatasetError::InvalidTable { year: 2022, .. }));
    }

    #[test]
    fn year_without_model_is_rejected() {
        let mut cohort = sources(SUBJECTS, SCALING, ATAR);
        cohort.year = 2023;
        let err = build_dataset(&cohort, &models(), "").expect_err("no 2023 model");
        assert!(matches!(err, DatasetError::MissingModel { year: 2023 }));
    }

    #[test]
    fn json_errors_name_their_origin() {
        let err = build_dataset(&sources("{", SCALING, ATAR), &models(), "bundled ")
            .expect_err("truncated JSON");
        assert!(err.to_string().contains("bundled 2022_subjects.json"));
    }
}
