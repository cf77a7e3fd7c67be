//! Common test utilities and helpers

/// Test data utilities
pub mod test_data {
    use chrono::NaiveDate;
    use polistats::models::{IndicatorYearRow, TenureRecord};
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Create a tenure record from (year, month, day) boundaries
    pub fn make_tenure(
        country: &str,
        leader: &str,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
    ) -> TenureRecord {
        TenureRecord {
            country: country.to_string(),
            leader: leader.to_string(),
            tenure_start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            tenure_end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            start_year: start.0,
            end_year: end.0,
        }
    }

    /// Create an indicator row with the given (label, value) entries
    pub fn make_row(
        country: &str,
        year: i32,
        values: &[(&str, Option<f64>)],
    ) -> IndicatorYearRow {
        let values: BTreeMap<String, Option<f64>> = values
            .iter()
            .map(|(label, value)| (label.to_string(), *value))
            .collect();
        IndicatorYearRow {
            country: country.to_string(),
            year,
            values,
        }
    }

    /// Write a PLAD-style tab-separated tenure file
    pub fn write_tenure_tsv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "country\tleader\tstartdate\tenddate\tstartyear\tendyear"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("polistats=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }
}
