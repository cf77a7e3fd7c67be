//! Comparison selector behavior tests

use pretty_assertions::assert_eq;
use test_log::test;

use polistats::compare::{ComparisonOutcome, Metric, Registry};

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert(
        "A",
        vec![
            Metric::new("GDP Growth", 2.3),
            Metric::new("Unemployment Rate", 5.0),
        ],
    );
    registry.insert(
        "B",
        vec![
            Metric::new("GDP Growth", 2.5),
            Metric::new("Unemployment Rate", 3.9),
            Metric::new("Tariff Rates", 12.0),
        ],
    );
    registry.insert("C", vec![Metric::new("COVID-19 Recovery", 70.0)]);
    registry
}

#[test]
fn test_two_entities_yield_common_metric_table() {
    let outcome = registry().compare(&["A", "B"]);

    let ComparisonOutcome::Table(table) = outcome else {
        panic!("expected a table");
    };
    assert_eq!(table.rows.len(), 2);
    let metrics: Vec<&str> = table.rows.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(metrics, vec!["GDP Growth", "Unemployment Rate"]);
    assert!(!metrics.contains(&"Tariff Rates"));
    assert_eq!(table.rows[0].left, 2.3);
    assert_eq!(table.rows[0].right, 2.5);
}

#[test]
fn test_one_or_three_selected_is_the_exactly_two_message() {
    let registry = registry();

    for selection in [vec!["A"], vec!["A", "B", "C"]] {
        let outcome = registry.compare(&selection);
        assert_eq!(
            outcome,
            ComparisonOutcome::SelectExactlyTwo {
                selected: selection.len()
            }
        );
        assert_eq!(
            outcome.message().unwrap(),
            "Please select exactly two leaders to compare."
        );
    }
}

#[test]
fn test_disjoint_metric_tables_report_no_common_statistics() {
    let outcome = registry().compare(&["A", "C"]);
    assert_eq!(
        outcome.message().unwrap(),
        "No common statistics found between A and C"
    );
}
