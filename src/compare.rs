use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::ReconciledRecord;

/// One named statistic for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

impl Metric {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Side-by-side row for one metric both entities report.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub metric: String,
    pub left: f64,
    pub right: f64,
}

/// Result of joining two entities' metric tables on metric name. Column
/// order follows selection order; row order follows the left table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub left: String,
    pub right: String,
    pub rows: Vec<ComparisonRow>,
}

/// What the selector has to show for a given selection. Only a two-entity
/// selection with shared metrics yields a table; everything else renders as
/// a human-readable message, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    Table(ComparisonTable),
    NoCommonMetrics { left: String, right: String },
    SelectExactlyTwo { selected: usize },
    UnknownEntity(String),
}

impl ComparisonOutcome {
    /// Message for non-table outcomes; `None` when there is a table to show.
    pub fn message(&self) -> Option<String> {
        match self {
            ComparisonOutcome::Table(_) => None,
            ComparisonOutcome::NoCommonMetrics { left, right } => Some(format!(
                "No common statistics found between {} and {}",
                left, right
            )),
            ComparisonOutcome::SelectExactlyTwo { .. } => {
                Some("Please select exactly two leaders to compare.".to_string())
            }
            ComparisonOutcome::UnknownEntity(name) => Some(format!("Unknown leader: {}", name)),
        }
    }
}

/// Injectable mapping from entity name to its metric table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: BTreeMap<String, Vec<Metric>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, metrics: Vec<Metric>) {
        self.entities.insert(name.into(), metrics);
    }

    pub fn names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&[Metric]> {
        self.entities.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Built-in example data for the dashboard demo.
    pub fn demo() -> Self {
        let mut registry = Registry::new();
        registry.insert(
            "Obama",
            vec![
                Metric::new("GDP Growth", 2.3),
                Metric::new("Unemployment Rate", 5.0),
                Metric::new("Inflation Rate", 1.6),
            ],
        );
        registry.insert(
            "Trump",
            vec![
                Metric::new("GDP Growth", 2.5),
                Metric::new("Unemployment Rate", 3.9),
                Metric::new("Inflation Rate", 1.8),
                Metric::new("Tariff Rates", 12.0),
            ],
        );
        registry.insert(
            "Biden",
            vec![
                Metric::new("GDP Growth", 3.0),
                Metric::new("Unemployment Rate", 4.5),
                Metric::new("COVID-19 Recovery", 70.0),
            ],
        );
        registry
    }

    /// Derive per-leader metric tables from reconciled pipeline output.
    ///
    /// One entity per (leader, country), keyed "Leader (CODE)". The latest
    /// tenure wins and its end-boundary row is preferred over the start
    /// boundary; indicators with no data are left out of the table.
    pub fn from_reconciled(records: &[ReconciledRecord]) -> Self {
        let mut latest: BTreeMap<String, &ReconciledRecord> = BTreeMap::new();
        for record in records {
            let key = format!("{} ({})", record.leader, record.country);
            // end_year >= start_year, so within one tenure a higher
            // observation year is the end boundary.
            let replace = match latest.get(&key) {
                Some(current) => {
                    (record.tenure_start, record.year) > (current.tenure_start, current.year)
                }
                None => true,
            };
            if replace {
                latest.insert(key, record);
            }
        }

        let mut registry = Registry::new();
        for (name, record) in latest {
            let metrics: Vec<Metric> = record
                .values
                .iter()
                .filter_map(|(label, value)| value.map(|v| Metric::new(label, v)))
                .collect();
            registry.insert(name, metrics);
        }
        registry
    }

    /// Compare a selection of entity names.
    pub fn compare(&self, selection: &[&str]) -> ComparisonOutcome {
        if selection.len() != 2 {
            return ComparisonOutcome::SelectExactlyTwo {
                selected: selection.len(),
            };
        }

        let left_name = selection[0];
        let right_name = selection[1];
        let Some(left) = self.get(left_name) else {
            return ComparisonOutcome::UnknownEntity(left_name.to_string());
        };
        let Some(right) = self.get(right_name) else {
            return ComparisonOutcome::UnknownEntity(right_name.to_string());
        };

        let right_by_name: BTreeMap<&str, f64> =
            right.iter().map(|m| (m.name.as_str(), m.value)).collect();

        // Inner join on metric name, left table order.
        let rows: Vec<ComparisonRow> = left
            .iter()
            .filter_map(|metric| {
                right_by_name.get(metric.name.as_str()).map(|&value| ComparisonRow {
                    metric: metric.name.clone(),
                    left: metric.value,
                    right: value,
                })
            })
            .collect();

        if rows.is_empty() {
            return ComparisonOutcome::NoCommonMetrics {
                left: left_name.to_string(),
                right: right_name.to_string(),
            };
        }

        ComparisonOutcome::Table(ComparisonTable {
            left: left_name.to_string(),
            right: right_name.to_string(),
            rows,
        })
    }
}
