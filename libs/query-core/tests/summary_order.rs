use query_core::{BreakdownResponse, SummaryResponse, UNCLASSIFIED_LABEL, UNDEFINED_LABEL};

fn counts() -> Vec<(Option<String>, u64)> {
    vec![
        (Some("A".to_string()), 3),
        (None, 2),
        (Some("B".to_string()), 5),
    ]
}

#[test]
fn summary_orders_by_count_desc_with_null_bucket() {
    let s = SummaryResponse::from_counts(10, counts(), UNCLASSIFIED_LABEL);
    let got: Vec<(&str, u64)> = s.groups.iter().map(|g| (g.group.as_str(), g.count)).collect();
    assert_eq!(got, vec![("B", 5), ("A", 3), ("Sin clasificar", 2)]);
    assert_eq!(s.total, 10);
}

#[test]
fn summary_ties_break_on_label() {
    let s = SummaryResponse::from_counts(
        4,
        vec![(Some("Z".into()), 2), (Some("M".into()), 2)],
        UNCLASSIFIED_LABEL,
    );
    assert_eq!(s.groups[0].group, "M");
    assert_eq!(s.groups[1].group, "Z");
}

#[test]
fn breakdown_percentages_and_total() {
    let b = BreakdownResponse::from_counts(counts(), UNDEFINED_LABEL, true);
    assert_eq!(b.total, 10);
    assert_eq!(b.groups[0].group, "B");
    assert_eq!(b.groups[0].percentage, 50.0);
    assert_eq!(b.groups[2].group, "Sin definir");
    assert_eq!(b.groups[2].percentage, 20.0);
}

#[test]
fn breakdown_rounds_to_two_decimals() {
    let b = BreakdownResponse::from_counts(
        vec![(Some("a".into()), 1), (Some("b".into()), 2)],
        UNDEFINED_LABEL,
        true,
    );
    assert_eq!(b.groups[0].percentage, 66.67);
    assert_eq!(b.groups[1].percentage, 33.33);
}

#[test]
fn breakdown_by_label_when_not_ordering_by_count() {
    let b = BreakdownResponse::from_counts(counts(), UNDEFINED_LABEL, false);
    let labels: Vec<&str> = b.groups.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "Sin definir"]);
}

#[test]
fn breakdown_empty() {
    let b = BreakdownResponse::from_counts(Vec::new(), UNDEFINED_LABEL, true);
    assert_eq!(b.total, 0);
    assert!(b.groups.is_empty());
}
