use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{IndicatorYearRow, ReconciledRecord, TenureRecord};

/// Join tenure records against indicator rows at both tenure boundaries and
/// produce the sorted combined table.
///
/// Inner-join semantics: a tenure matching neither its start-year nor its
/// end-year key is dropped. The union deduplicates by full-row identity, so
/// a tenure whose start and end boundaries hit the *same* indicator row
/// contributes one row; distinct boundary matches contribute two.
pub fn reconcile(
    tenures: &[TenureRecord],
    rows: &[IndicatorYearRow],
) -> Result<Vec<ReconciledRecord>> {
    ensure_shared_country_domain(tenures, rows)?;

    let rows_by_key: HashMap<(&str, i32), &IndicatorYearRow> = rows
        .iter()
        .map(|row| ((row.country.as_str(), row.year), row))
        .collect();

    let start_join = tenures.iter().filter_map(|tenure| {
        rows_by_key
            .get(&(tenure.country.as_str(), tenure.start_year))
            .map(|row| ReconciledRecord::from_parts(tenure, row))
    });
    let end_join = tenures.iter().filter_map(|tenure| {
        rows_by_key
            .get(&(tenure.country.as_str(), tenure.end_year))
            .map(|row| ReconciledRecord::from_parts(tenure, row))
    });

    let mut combined: Vec<ReconciledRecord> = start_join.collect();
    for record in end_join {
        if !combined.contains(&record) {
            combined.push(record);
        }
    }

    // Stable sort: ties keep input order (start-boundary rows land first).
    combined.sort_by(|a, b| {
        (a.country.as_str(), a.tenure_start, a.leader.as_str()).cmp(&(
            b.country.as_str(),
            b.tenure_start,
            b.leader.as_str(),
        ))
    });

    debug!(
        "Reconciled {} tenure records against {} indicator rows into {} rows",
        tenures.len(),
        rows.len(),
        combined.len()
    );
    Ok(combined)
}

/// Both inputs non-empty with zero overlapping country codes means the two
/// sources use incompatible code schemes, not that there is no data.
fn ensure_shared_country_domain(
    tenures: &[TenureRecord],
    rows: &[IndicatorYearRow],
) -> Result<()> {
    if tenures.is_empty() || rows.is_empty() {
        return Ok(());
    }

    let tenure_codes: BTreeSet<&str> = tenures.iter().map(|t| t.country.as_str()).collect();
    let row_codes: BTreeSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();

    if tenure_codes.intersection(&row_codes).next().is_none() {
        let sample = |codes: &BTreeSet<&str>| {
            codes
                .iter()
                .take(3)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(Error::SchemaMismatch(format!(
            "tenure source has [{}], indicator source has [{}]",
            sample(&tenure_codes),
            sample(&row_codes)
        )));
    }

    Ok(())
}
