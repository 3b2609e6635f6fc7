use crate::render::{render_bands, render_curve, render_estimate, render_subjects};
use atar_engine::config::AppConfig;
use atar_engine::dataset::{DataProvider, DatasetRegistry, Year};
use atar_engine::error::AppError;
use atar_engine::scoring::{read_score_sheet, AtarEstimator, RawScore, Score, SelectedSubjects};
use atar_engine::{telemetry, SubjectCode};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::num::NonZeroU8;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "ATAR Estimator",
    about = "Estimate an ATAR from raw subject results using published scaling data",
    version
)]
struct Cli {
    /// Directory of cohort datasets (overrides ATAR_DATA_DIR; bundled data otherwise)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scale results, sum the best five and look up the ATAR
    Estimate(EstimateArgs),
    /// List the subjects offered to a cohort with their scaling coefficients
    Subjects(YearArgs),
    /// Sample a subject's raw-to-scaled curve
    Curve(CurveArgs),
    /// Show TEA bands that map to a single confirmed ATAR
    Bands(YearArgs),
}

#[derive(Args, Debug)]
struct YearArgs {
    /// Cohort year (defaults to ATAR_DEFAULT_YEAR, then the latest dataset)
    #[arg(long)]
    year: Option<Year>,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[command(flatten)]
    year: YearArgs,
    /// CSV sheet with `code,score` columns
    #[arg(long, conflicts_with = "score")]
    scores: Option<PathBuf>,
    /// Subject result as CODE=RAW; leave RAW empty to select without a score
    #[arg(long = "score", value_name = "CODE=RAW", value_parser = parse_score_arg)]
    score: Vec<(SubjectCode, Score)>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct CurveArgs {
    #[command(flatten)]
    year: YearArgs,
    /// Subject code, e.g. MAM
    #[arg(long)]
    subject: String,
    /// Raw-score interval between samples
    #[arg(long, default_value = "10")]
    step: NonZeroU8,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = Some(dir);
    }
    telemetry::init(&config.telemetry)?;

    let registry = match &config.data.data_dir {
        Some(dir) => DatasetRegistry::from_dir(dir)?,
        None => DatasetRegistry::bundled()?,
    };
    info!(?config.environment, years = ?registry.years(), "cohort data ready");

    let default_year = config.data.default_year;
    let estimator = AtarEstimator::new(registry);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Estimate(args) => run_estimate(&estimator, args, default_year, &mut out),
        Command::Subjects(args) => {
            let year = resolve_year(args.year, default_year, estimator.provider())?;
            let catalog = estimator.provider().subjects(year)?;
            render_subjects(&mut out, year, catalog)?;
            Ok(())
        }
        Command::Curve(args) => {
            let year = resolve_year(args.year.year, default_year, estimator.provider())?;
            let code = SubjectCode::new(args.subject.trim());
            let points = estimator.scaling_curve(&code, year, args.step)?;
            render_curve(&mut out, year, &code, &points)?;
            Ok(())
        }
        Command::Bands(args) => {
            let year = resolve_year(args.year, default_year, estimator.provider())?;
            let bands = estimator.confirmed_bands(year)?;
            render_bands(&mut out, year, &bands)?;
            Ok(())
        }
    }
}

fn run_estimate<W: Write>(
    estimator: &AtarEstimator<DatasetRegistry>,
    args: EstimateArgs,
    default_year: Option<Year>,
    out: &mut W,
) -> Result<(), AppError> {
    let EstimateArgs {
        year,
        scores,
        score,
        json,
    } = args;

    let year = resolve_year(year.year, default_year, estimator.provider())?;
    let selected = match scores {
        Some(path) => read_score_sheet(path)?,
        None => score.into_iter().collect::<SelectedSubjects>(),
    };

    let catalog = estimator.provider().subjects(year)?;
    let (subjects, dropped) = selected.for_year(catalog);
    if !dropped.is_empty() {
        warn!(year, ?dropped, "ignoring subjects not offered to this cohort");
    }

    let report = estimator.estimate(&subjects, year)?;

    if json {
        let body = serde_json::to_string_pretty(&report).map_err(io::Error::from)?;
        writeln!(out, "{body}")?;
    } else {
        render_estimate(out, &report, &dropped)?;
    }
    Ok(())
}

fn resolve_year(
    requested: Option<Year>,
    configured: Option<Year>,
    registry: &DatasetRegistry,
) -> Result<Year, AppError> {
    requested
        .or(configured)
        .or_else(|| registry.latest_year())
        .ok_or_else(|| AppError::Input("no cohort datasets are loaded".to_string()))
}

fn parse_score_arg(raw: &str) -> Result<(SubjectCode, Score), String> {
    let (code, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=RAW, got '{raw}'"))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing subject code in '{raw}'"));
    }
    let score = RawScore::normalize_input(value).map_err(|err| err.to_string())?;
    Ok((SubjectCode::new(code), score))
}
