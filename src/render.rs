//! Plain-text views of engine results for the terminal.

use atar_engine::dataset::{ConfirmedBand, SubjectCatalog, Year};
use atar_engine::scoring::{CurvePoint, EstimateReport, Score, SubjectRow};
use atar_engine::SubjectCode;
use std::io::{self, Write};

pub fn render_estimate<W: Write>(
    out: &mut W,
    report: &EstimateReport,
    dropped: &[SubjectCode],
) -> io::Result<()> {
    writeln!(out, "ATAR estimate for the {} cohort", report.year)?;
    writeln!(out, "TEA: {:.2}", report.tea)?;
    writeln!(out, "ATAR: {}", report.atar)?;

    if report.rows.is_empty() {
        writeln!(out, "\nSubjects: none selected")?;
    } else {
        writeln!(out, "\nSubjects")?;
        for row in &report.rows {
            writeln!(out, "- {}", subject_line(row))?;
        }
    }

    if !dropped.is_empty() {
        let codes: Vec<&str> = dropped.iter().map(SubjectCode::as_str).collect();
        writeln!(
            out,
            "\nNot offered in {}: {}",
            report.year,
            codes.join(", ")
        )?;
    }

    Ok(())
}

fn subject_line(row: &SubjectRow) -> String {
    let label = match &row.name {
        Some(name) => format!("{} ({})", name, row.code),
        None => row.code.to_string(),
    };

    match (row.score, row.scaled) {
        (Score::Present(raw), Some(scaled)) => {
            let potential = row.potential.unwrap_or_default();
            format!(
                "{}: raw {} | scaled {:.2} | +{:.2} TEA next mark",
                label, raw, scaled, potential
            )
        }
        _ => format!("{}: no score", label),
    }
}

pub fn render_subjects<W: Write>(
    out: &mut W,
    year: Year,
    catalog: &SubjectCatalog,
) -> io::Result<()> {
    writeln!(out, "Subjects offered in {} ({})", year, catalog.len())?;
    for (code, info) in catalog.iter() {
        // Accelerated entries were sat a year early and scale like that cohort.
        let timing = if info.is_accelerated() {
            format!(" | uses {} scaling", year.saturating_sub(1))
        } else {
            String::new()
        };
        writeln!(
            out,
            "- {}: {} | a {:.6} | b {:.4}{}",
            code, info.name, info.coefficients.a, info.coefficients.b, timing
        )?;
    }
    Ok(())
}

pub fn render_curve<W: Write>(
    out: &mut W,
    year: Year,
    code: &SubjectCode,
    points: &[CurvePoint],
) -> io::Result<()> {
    writeln!(out, "Scaling curve for {} ({})", code, year)?;
    for point in points {
        writeln!(out, "{:>3} -> {:6.2}", point.raw, point.scaled)?;
    }
    Ok(())
}

pub fn render_bands<W: Write>(
    out: &mut W,
    year: Year,
    bands: &[ConfirmedBand],
) -> io::Result<()> {
    if bands.is_empty() {
        return writeln!(out, "Confirmed bands for {}: none", year);
    }

    writeln!(out, "Confirmed bands for {}", year)?;
    for band in bands {
        writeln!(
            out,
            "- TEA {:.2}-{:.2}: ATAR {:.2}",
            band.lower_tea, band.upper_tea, band.atar
        )?;
    }
    Ok(())
}
