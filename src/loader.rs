use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{normalize_country_code, TenureRecord};

/// Raw row as it appears in a PLAD-style export. Extra columns are ignored;
/// only the tenure fields matter here.
#[derive(Debug, Deserialize)]
struct RawTenureRow {
    country: String,
    leader: String,
    startdate: String,
    enddate: String,
    startyear: String,
    endyear: String,
}

/// Date formats seen in tenure exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d%b%Y"];

/// Load tenure records from a tab-separated file, in source order.
///
/// Each row is validated on the way in: year columns must coerce to
/// integers, dates must parse, `startdate <= enddate`, and the year columns
/// must agree with the date columns. Violations fail with
/// [`Error::MalformedRecord`] carrying the offending line number.
pub fn load_tenures(path: impl AsRef<Path>) -> Result<Vec<TenureRecord>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RawTenureRow>().enumerate() {
        // Header occupies line 1.
        let line = index as u64 + 2;
        let row = row.map_err(|e| Error::MalformedRecord {
            line,
            reason: e.to_string(),
        })?;
        records.push(parse_row(line, row)?);
    }

    debug!("Loaded {} tenure records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_row(line: u64, row: RawTenureRow) -> Result<TenureRecord> {
    let start_year = parse_year(line, "startyear", &row.startyear)?;
    let end_year = parse_year(line, "endyear", &row.endyear)?;
    let tenure_start = parse_date(line, "startdate", &row.startdate)?;
    let tenure_end = parse_date(line, "enddate", &row.enddate)?;

    if tenure_start > tenure_end {
        return Err(malformed(
            line,
            format!("startdate {} is after enddate {}", tenure_start, tenure_end),
        ));
    }
    if tenure_start.year() != start_year {
        return Err(malformed(
            line,
            format!(
                "startyear {} does not match startdate {}",
                start_year, tenure_start
            ),
        ));
    }
    if tenure_end.year() != end_year {
        return Err(malformed(
            line,
            format!("endyear {} does not match enddate {}", end_year, tenure_end),
        ));
    }

    Ok(TenureRecord {
        country: normalize_country_code(&row.country),
        leader: row.leader,
        tenure_start,
        tenure_end,
        start_year,
        end_year,
    })
}

/// Year columns in PLAD exports come through as floats ("1989.0"); coerce
/// whole-number floats, reject everything else.
fn parse_year(line: u64, field: &str, raw: &str) -> Result<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }

    let as_float: f64 = raw
        .parse()
        .map_err(|_| malformed(line, format!("{} `{}` is not a number", field, raw)))?;
    if as_float.fract() != 0.0 {
        return Err(malformed(
            line,
            format!("{} `{}` is not a whole year", field, raw),
        ));
    }
    Ok(as_float as i32)
}

fn parse_date(line: u64, field: &str, raw: &str) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(malformed(
        line,
        format!("{} `{}` is not a parseable date", field, raw),
    ))
}

fn malformed(line: u64, reason: String) -> Error {
    Error::MalformedRecord { line, reason }
}
