mod common;

use common::{MULTI_VEHICLE_FILE, dataset, fixture_path};
use plate_lookup::{
    Dataset, LoadOptions, SearchOutcome,
    columns::{ColumnRules, SearchableColumnSet},
    dataset::DEFAULT_PLACEHOLDER_PREFIX,
    load_dataset, search,
    search::{normalize_text, record_matches},
};
use proptest::prelude::*;

fn positions(outcome: &SearchOutcome<'_>) -> Vec<usize> {
    match outcome {
        SearchOutcome::Matches(result) => result.records.iter().map(|r| r.position()).collect(),
        other => panic!("expected matches, got {other:?}"),
    }
}

fn scenario_dataset() -> Dataset {
    dataset(&["NIK", "No.Plat"], &[&["3201020304050001", "B1234XYZ"]])
}

#[test]
fn plate_query_ignores_case_and_spacing() {
    let data = scenario_dataset();
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(positions(&search(&data, &columns, "b 1234 xyz")), vec![0]);
}

#[test]
fn unknown_number_matches_nothing() {
    let data = scenario_dataset();
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert!(positions(&search(&data, &columns, "9999999")).is_empty());
}

#[test]
fn empty_and_blank_queries_wait_for_input() {
    let data = scenario_dataset();
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(search(&data, &columns, ""), SearchOutcome::EmptyQuery);
    assert_eq!(search(&data, &columns, "   "), SearchOutcome::EmptyQuery);
}

#[test]
fn schema_without_searchable_columns_is_reported() {
    let data = dataset(&["Departemen", "Kota"], &[&["Gudang", "Bogor"]]);
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(
        search(&data, &columns, "bogor"),
        SearchOutcome::NoSearchableColumns
    );
}

#[test]
fn fixture_queries_cover_identity_name_and_plates() {
    let data = load_dataset(&fixture_path(MULTI_VEHICLE_FILE), &LoadOptions::default())
        .expect("load fixture");
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(columns.len(), 6);

    // NIK keeps its leading zeros.
    assert_eq!(positions(&search(&data, &columns, "00320102")), vec![1]);
    // Second-motorcycle plate.
    assert_eq!(positions(&search(&data, &columns, "f 3333-cd")), vec![1]);
    assert_eq!(positions(&search(&data, &columns, "citra")), vec![2]);
    // Department is not a search column.
    assert!(positions(&search(&data, &columns, "gudang")).is_empty());
    assert_eq!(positions(&search(&data, &columns, "b")), vec![0, 1, 3]);
}

#[test]
fn legacy_name_column_is_detected() {
    let data = dataset(
        &["Nama Lengkap", "NIK", "No.Plat"],
        &[&["Andi Saputra", "1", "B1"], &["Budi", "2", "D2"]],
    );
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(positions(&search(&data, &columns, "SAPUTRA")), vec![0]);
}

#[test]
fn police_number_column_is_searchable() {
    let data = dataset(
        &["Departemen", "No. Pol"],
        &[&["Gudang", "B 1234 XYZ"], &["HR", "D 7788 EF"]],
    );
    let columns = ColumnRules::default().searchable_columns(data.headers());
    assert_eq!(columns.len(), 1);
    assert_eq!(positions(&search(&data, &columns, "d7788")), vec![1]);
}

fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-Za-z0-9 .\\-]{0,12}", 3)
}

fn generated_dataset(rows: Vec<Vec<String>>) -> Dataset {
    Dataset::from_raw(
        vec!["NIK".to_string(), "Nama".to_string(), "No.Plat".to_string()],
        rows,
        DEFAULT_PLACEHOLDER_PREFIX,
    )
}

fn searchable(data: &Dataset) -> SearchableColumnSet {
    ColumnRules::default().searchable_columns(data.headers())
}

/// Matched positions, or `None` for the non-match outcomes.
fn matched(outcome: SearchOutcome<'_>) -> Option<Vec<usize>> {
    match outcome {
        SearchOutcome::Matches(result) => {
            Some(result.records.iter().map(|r| r.position()).collect())
        }
        SearchOutcome::EmptyQuery | SearchOutcome::NoSearchableColumns => None,
    }
}

proptest! {
    #[test]
    fn query_formatting_never_changes_results(
        rows in proptest::collection::vec(row_strategy(), 0..20),
        query in "[A-Za-z0-9 .\\-]{1,6}",
    ) {
        let data = generated_dataset(rows);
        let columns = searchable(&data);
        let stripped = normalize_text(&query);
        prop_assert_eq!(
            matched(search(&data, &columns, &query)),
            matched(search(&data, &columns, &stripped))
        );
    }

    #[test]
    fn every_row_matches_iff_a_cell_contains_the_query(
        rows in proptest::collection::vec(row_strategy(), 0..20),
        query in "[a-z0-9]{1,3}",
    ) {
        let data = generated_dataset(rows);
        let columns = searchable(&data);
        prop_assert_eq!(columns.len(), 3);
        let needle = query.to_uppercase();
        let expected = data
            .records()
            .iter()
            .filter(|record| {
                record
                    .values()
                    .iter()
                    .any(|cell| normalize_text(cell).contains(&needle))
            })
            .map(|record| record.position())
            .collect::<Vec<_>>();
        prop_assert_eq!(matched(search(&data, &columns, &query)), Some(expected));
        for record in data.records() {
            let hit = record_matches(record, &columns, &needle);
            prop_assert_eq!(
                hit,
                record.values().iter().any(|cell| normalize_text(cell).contains(&needle))
            );
        }
    }

    #[test]
    fn whitespace_queries_are_always_empty(
        rows in proptest::collection::vec(row_strategy(), 0..5),
        query in "[ \t]{0,6}",
    ) {
        let data = generated_dataset(rows);
        let columns = searchable(&data);
        prop_assert_eq!(search(&data, &columns, &query), SearchOutcome::EmptyQuery);
    }
}
