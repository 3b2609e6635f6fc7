use super::common::*;
use crate::dataset::{DatasetError, SubjectCode};
use crate::scoring::aggregate::{
    map_raw_to_scaled_scores, subject_breakdown, tea_from_scaled_scores, tea_from_subjects,
};
use crate::scoring::domain::Score;
use crate::scoring::scaling::scaled_score;

fn logistic(offset: f64) -> f64 {
    100.0 / (1.0 + (-STEEPNESS * offset).exp())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn tea_of_nothing_is_zero() {
    assert_eq!(tea_from_scaled_scores(&[]), 0.0);
    assert_eq!(tea_from_scaled_scores(&[None, None]), 0.0);
}

#[test]
fn tea_sums_everything_when_five_or_fewer() {
    let scores = [Some(61.5), None, Some(72.25), Some(48.0)];
    assert_eq!(tea_from_scaled_scores(&scores), 72.25 + 61.5 + 48.0);
}

#[test]
fn tea_keeps_only_best_five() {
    let scores = [
        Some(40.0),
        Some(90.0),
        None,
        Some(55.0),
        Some(70.0),
        Some(35.0),
        Some(80.0),
        Some(60.0),
    ];
    assert_eq!(tea_from_scaled_scores(&scores), 90.0 + 80.0 + 70.0 + 60.0 + 55.0);
}

#[test]
fn tied_maxima_are_each_counted_once() {
    let scores = [Some(80.0); 7];
    assert_eq!(tea_from_scaled_scores(&scores), 400.0);
}

#[test]
fn unscored_subjects_map_to_blank_not_zero() {
    let registry = registry();
    let subjects = selection(&[("ENG", Some(0)), ("MAM", None)]);

    let scaled = map_raw_to_scaled_scores(&registry, &subjects, YEAR).expect("scales");

    let english = scaled
        .get(&SubjectCode::from("ENG"))
        .expect("ENG selected")
        .expect("ENG scored");
    assert!(english > 0.0);
    assert_eq!(scaled.get(&SubjectCode::from("MAM")), Some(None));
    assert_eq!(scaled.values().len(), 2);
}

#[test]
fn scoring_an_unknown_subject_fails() {
    let registry = registry();
    let subjects = selection(&[("ENG", Some(70)), ("GEO", Some(65))]);

    let err = map_raw_to_scaled_scores(&registry, &subjects, YEAR).expect_err("GEO unknown");
    assert!(matches!(
        err,
        DatasetError::MissingCoefficients { ref code, year: YEAR } if code.as_str() == "GEO"
    ));
}

#[test]
fn unscored_unknown_subject_is_ignored() {
    let registry = registry();
    let subjects = selection(&[("ENG", Some(70)), ("GEO", None)]);

    let tea = tea_from_subjects(&registry, &subjects, YEAR).expect("GEO is unscored");
    assert_close(tea, logistic(20.0));
}

#[test]
fn unsupported_year_is_not_substituted() {
    let registry = registry();
    let subjects = selection(&[("ENG", Some(70))]);

    let err = tea_from_subjects(&registry, &subjects, 2019).expect_err("no 2019 data");
    assert!(matches!(err, DatasetError::UnsupportedYear { year: 2019 }));
}

fn full_selection() -> crate::scoring::domain::SelectedSubjects {
    selection(&[
        ("ECO", None),
        ("LEG", Some(80)),
        ("CHM", Some(70)),
        ("ENG", Some(90)),
        ("PHY", Some(69)),
        ("SPM", Some(70)),
        ("MAM", Some(90)),
        ("BIO", Some(85)),
    ])
}

#[test]
fn breakdown_orders_by_scaled_score_with_blanks_last() {
    let rows = subject_breakdown(&dataset(), &full_selection()).expect("breakdown");

    let order: Vec<&str> = rows.iter().map(|row| row.code.as_str()).collect();
    assert_eq!(
        order,
        vec!["ENG", "MAM", "SPM", "BIO", "CHM", "PHY", "LEG", "ECO"]
    );
    assert_eq!(rows[0].name.as_deref(), Some("English"));
    assert_eq!(rows[7].score, Score::Absent);
    assert_eq!(rows[7].scaled, None);
    assert_eq!(rows[7].potential, None);
}

#[test]
fn potential_inside_top_five_is_the_next_mark_gain() {
    let rows = subject_breakdown(&dataset(), &full_selection()).expect("breakdown");

    // ENG sits 40 marks above its midpoint.
    assert_close(rows[0].potential.expect("scored"), logistic(41.0) - logistic(40.0));
    // CHM is fifth and still counts in full.
    assert_close(rows[4].potential.expect("scored"), logistic(11.0) - logistic(10.0));
}

#[test]
fn potential_outside_top_five_counts_only_the_displacement() {
    let rows = subject_breakdown(&dataset(), &full_selection()).expect("breakdown");

    // PHY at 69 scales below CHM; one more mark overtakes it.
    let physics = &rows[5];
    assert_eq!(physics.code.as_str(), "PHY");
    assert_close(
        physics.potential.expect("scored"),
        logistic(10.5) - logistic(10.0),
    );

    // LEG is too far behind for one mark to matter.
    let legal = &rows[6];
    assert_eq!(legal.code.as_str(), "LEG");
    assert_eq!(legal.potential, Some(0.0));
}

#[test]
fn full_marks_have_no_potential() {
    let dataset = dataset();
    let rows = subject_breakdown(&dataset, &selection(&[("SPM", Some(100))])).expect("row");

    let scaled = rows[0].scaled.expect("scored");
    assert!(scaled < 100.0);
    assert_eq!(scaled, scaled_score(100.0, coefficients(45.0)));
    assert_eq!(rows[0].potential, Some(0.0));
}

#[test]
fn equal_scores_keep_selection_order_at_the_boundary() {
    let subjects = selection(&[
        ("ENG", Some(90)),
        ("MAM", Some(90)),
        ("SPM", Some(70)),
        ("BIO", Some(85)),
        ("DIT", Some(70)),
        ("CHM", Some(70)),
    ]);

    let rows = subject_breakdown(&dataset(), &subjects).expect("breakdown");

    assert_eq!(rows[4].code.as_str(), "DIT");
    assert_eq!(rows[5].code.as_str(), "CHM");
    assert_eq!(rows[4].scaled, rows[5].scaled);
    // CHM needs one mark to displace DIT, gaining the difference.
    assert_close(
        rows[5].potential.expect("scored"),
        logistic(11.0) - logistic(10.0),
    );
}
