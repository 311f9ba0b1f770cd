use query_core::{QueryError, SortColumn, SortDirection, SortSpec, MAX_SORT_COLUMNS};

#[test]
fn describe_preserves_priority_order() {
    let spec = SortSpec::new(vec![SortColumn::desc("nombres"), SortColumn::asc("id")]);
    assert_eq!(spec.describe(), "ORDER BY nombres DESC, id ASC");
    assert_eq!(
        spec.directions(),
        vec![("nombres", SortDirection::Desc), ("id", SortDirection::Asc)]
    );
}

#[test]
fn describe_empty() {
    assert_eq!(SortSpec::empty().describe(), "");
}

#[test]
fn wire_roundtrip() {
    let spec: SortSpec = serde_json::from_str(
        r#"[{"column":"nombres","direction":"desc"},{"column":"id","direction":"asc"}]"#,
    )
    .expect("parse");
    let back = serde_json::to_string(&spec).unwrap();
    assert_eq!(
        back,
        r#"[{"column":"nombres","direction":"desc"},{"column":"id","direction":"asc"}]"#
    );
}

#[test]
fn direction_defaults_to_asc() {
    let spec: SortSpec = serde_json::from_str(r#"[{"column":"id"}]"#).unwrap();
    assert_eq!(spec.0[0].direction, SortDirection::Asc);
}

#[test]
fn rejects_duplicate_columns() {
    let spec: SortSpec = serde_json::from_str(r#"[{"column":"id"},{"column":"id"}]"#).unwrap();
    let err = spec.validate().unwrap_err();
    assert!(matches!(err, QueryError::Validation { .. }));
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn rejects_more_than_max_columns() {
    let ok: SortSpec = (0..MAX_SORT_COLUMNS)
        .map(|i| SortColumn::asc(format!("c{i}")))
        .collect();
    assert!(ok.validate().is_ok());

    let too_long: SortSpec = (0..=MAX_SORT_COLUMNS)
        .map(|i| SortColumn::asc(format!("c{i}")))
        .collect();
    assert!(too_long.validate().is_err());
}

#[test]
fn rejects_blank_column() {
    let spec: SortSpec = serde_json::from_str(r#"[{"column":"   "}]"#).unwrap();
    assert!(spec.validate().is_err());
}

#[test]
fn single_builds_default_sort() {
    let spec = SortSpec::single("fecha_creacion", SortDirection::Desc);
    assert_eq!(spec.len(), 1);
    assert_eq!(spec.describe(), "ORDER BY fecha_creacion DESC");
}
