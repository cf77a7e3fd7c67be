use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A macroeconomic indicator requested from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indicator {
    pub code: String,
    pub label: String,
}

impl Indicator {
    pub fn new(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
        }
    }

    /// The indicator set the dashboard tracks by default.
    pub fn defaults() -> Vec<Indicator> {
        vec![
            Indicator::new("NY.GDP.DEFL.KD.ZG", "Inflation Rate"),
            Indicator::new("SL.UEM.TOTL.ZS", "Unemployment Rate"),
            Indicator::new("NY.GDP.MKTP.KD.ZG", "GDP Growth"),
            Indicator::new("NY.GDP.PCAP.KD.ZG", "GDP Per Capita Growth"),
        ]
    }

    /// Drop repeated codes, keeping the first label seen for each code.
    pub fn dedup_by_code(indicators: &[Indicator]) -> Vec<Indicator> {
        let mut seen = std::collections::HashSet::new();
        indicators
            .iter()
            .filter(|i| seen.insert(i.code.clone()))
            .cloned()
            .collect()
    }
}

/// Inclusive year range for indicator queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

/// One leader's stay in office for a country.
///
/// Invariants enforced by the loader: `tenure_start <= tenure_end`,
/// `start_year == tenure_start.year()`, `end_year == tenure_end.year()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureRecord {
    pub country: String,
    pub leader: String,
    pub tenure_start: NaiveDate,
    pub tenure_end: NaiveDate,
    pub start_year: i32,
    pub end_year: i32,
}

/// A single provider observation before pivoting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorObservation {
    pub country: String,
    pub year: i32,
    pub indicator: String,
    pub value: Option<f64>,
}

/// Denormalized per-(country, year) row with one entry per indicator label.
///
/// A `None` value means the provider reported the key but has no data for
/// that indicator; keys absent from the provider response get no row at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorYearRow {
    pub country: String,
    pub year: i32,
    pub values: BTreeMap<String, Option<f64>>,
}

/// A tenure record joined with the indicator row at one of its boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub country: String,
    pub leader: String,
    pub tenure_start: NaiveDate,
    pub tenure_end: NaiveDate,
    pub start_year: i32,
    pub end_year: i32,
    /// Year of the matched indicator row; always `start_year` or `end_year`.
    pub year: i32,
    pub values: BTreeMap<String, Option<f64>>,
}

impl ReconciledRecord {
    pub fn from_parts(tenure: &TenureRecord, row: &IndicatorYearRow) -> Self {
        Self {
            country: tenure.country.clone(),
            leader: tenure.leader.clone(),
            tenure_start: tenure.tenure_start,
            tenure_end: tenure.tenure_end,
            start_year: tenure.start_year,
            end_year: tenure.end_year,
            year: row.year,
            values: row.values.clone(),
        }
    }
}

/// Normalize a country identifier for joining.
///
/// The join is code-for-code only: trim plus ASCII uppercase, no name
/// crosswalk. "United States of America" and "UNITED STATES" stay distinct.
pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub rate_limit_per_minute: u32,
    pub tenure_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            api_base_url: std::env::var("WORLD_BANK_API_URL")
                .unwrap_or_else(|_| "https://api.worldbank.org/v2".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            tenure_path: std::env::var("TENURE_PATH")
                .unwrap_or_else(|_| "PLAD_April_2024.tab".to_string()),
        })
    }
}
