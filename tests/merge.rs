use fbref_ingest::merge::{EntityKind, merge_keys, safe_merge, strip_duplicate_columns};
use fbref_ingest::table::{Cell, StatTable};

fn table(names: &[&str], rows: &[&[&str]]) -> StatTable {
    StatTable::from_rows(
        names.iter().map(|n| n.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| Cell::text(*v)).collect())
            .collect(),
    )
}

fn keys(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|k| k.to_string()).collect()
}

#[test]
fn team_keys_prefer_the_id_column() {
    let t = table(&["Squad", "Team ID", "Gls"], &[&["Arsenal", "18bb7c10", "88"]]);
    assert_eq!(merge_keys(&t, EntityKind::Team), vec!["Team ID"]);

    let no_ids = table(&["Squad", "Gls"], &[&["Arsenal", "88"]]);
    assert_eq!(merge_keys(&no_ids, EntityKind::Team), vec!["Squad"]);

    let nothing = table(&["Gls"], &[&["88"]]);
    assert!(merge_keys(&nothing, EntityKind::Team).is_empty());
}

#[test]
fn player_keys_fall_back_to_name_and_squad() {
    let with_ids = table(
        &["Player", "Player ID", "Team ID"],
        &[&["Saka", "bc7dc64d", "18bb7c10"]],
    );
    assert_eq!(
        merge_keys(&with_ids, EntityKind::Player),
        vec!["Player ID", "Team ID"]
    );

    let names_only = table(&["Player", "Squad"], &[&["Saka", "Arsenal"]]);
    assert_eq!(
        merge_keys(&names_only, EntityKind::Player),
        vec!["Player", "Squad"]
    );
}

#[test]
fn empty_sides_short_circuit() {
    let acc = table(&["Team ID", "Gls"], &[&["t1", "2"], &["t2", "3"]]);
    let outcome = safe_merge(acc.clone(), StatTable::new(), &keys(&["Team ID"]));
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.table.row_count(), 2);
    assert_eq!(
        outcome.table.column_names().collect::<Vec<_>>(),
        acc.column_names().collect::<Vec<_>>()
    );

    let incoming = table(&["Team ID", "Sh"], &[&["t1", "10"]]);
    let outcome = safe_merge(StatTable::new(), incoming, &keys(&["Team ID"]));
    assert_eq!(outcome.table.row_count(), 1);
    assert!(outcome.table.has_column("Sh"));
}

#[test]
fn no_shared_keys_drops_the_right_side() {
    let acc = table(&["Team ID", "Gls"], &[&["t1", "2"]]);
    let incoming = table(&["Squad", "Sh"], &[&["Arsenal", "10"]]);
    let outcome = safe_merge(acc, incoming, &keys(&["Team ID"]));
    assert_eq!(outcome.table.row_count(), 1);
    assert!(!outcome.table.has_column("Sh"));
    assert!(outcome.warning.is_none());
}

#[test]
fn right_side_duplicates_keep_first_occurrence() {
    let acc = table(&["Team ID", "Gls"], &[&["t1", "2"]]);
    let incoming = table(
        &["Team ID", "Sh"],
        &[&["t1", "10"], &["t1", "99"]],
    );
    let outcome = safe_merge(acc, incoming, &keys(&["Team ID"]));
    assert_eq!(outcome.table.row_count(), 1);
    assert_eq!(
        outcome.table.cell("Sh", 0).and_then(|c| c.as_text()),
        Some("10")
    );
}

#[test]
fn outer_join_keeps_rows_from_both_sides() {
    let acc = table(&["Team ID", "Gls"], &[&["t1", "2"], &["t2", "3"]]);
    let incoming = table(&["Team ID", "Sh"], &[&["t2", "12"], &["t3", "7"]]);
    let outcome = safe_merge(acc, incoming, &keys(&["Team ID"]));
    let merged = &outcome.table;

    assert_eq!(merged.row_count(), 3);
    // t1: left only.
    assert!(merged.cell("Sh", 0).expect("cell").is_missing());
    // t2: matched.
    assert_eq!(merged.cell("Sh", 1).and_then(|c| c.as_text()), Some("12"));
    // t3: right only, key carried over, left stats missing.
    assert_eq!(
        merged.cell("Team ID", 2).and_then(|c| c.as_text()),
        Some("t3")
    );
    assert!(merged.cell("Gls", 2).expect("cell").is_missing());
    assert_eq!(merged.cell("Sh", 2).and_then(|c| c.as_text()), Some("7"));
}

#[test]
fn colliding_columns_get_the_duplicate_suffix() {
    let acc = table(&["Team ID", "90s"], &[&["t1", "38"]]);
    let incoming = table(&["Team ID", "90s"], &[&["t1", "38"]]);
    let outcome = safe_merge(acc, incoming, &keys(&["Team ID"]));
    let names: Vec<_> = outcome.table.column_names().collect();
    assert_eq!(names, vec!["Team ID", "90s", "90s_duplicate"]);

    let mut cleaned = outcome.table;
    strip_duplicate_columns(&mut cleaned);
    assert_eq!(
        cleaned.column_names().collect::<Vec<_>>(),
        vec!["Team ID", "90s"]
    );
}

#[test]
fn fan_out_past_both_thresholds_warns_once() {
    // 200 accumulator rows, 150 unmatched incoming rows: 350 > 1.5 * 200
    // and 350 > 100, so this merge must warn.
    let left_rows: Vec<Vec<Cell>> = (0..200)
        .map(|i| vec![Cell::text(format!("p{i}")), Cell::text("1")])
        .collect();
    let acc = StatTable::from_rows(
        vec!["Player ID".to_string(), "Gls".to_string()],
        left_rows,
    );
    let right_rows: Vec<Vec<Cell>> = (0..150)
        .map(|i| vec![Cell::text(format!("q{i}")), Cell::text("2")])
        .collect();
    let incoming = StatTable::from_rows(
        vec!["Player ID".to_string(), "Sh".to_string()],
        right_rows,
    );

    let outcome = safe_merge(acc, incoming, &keys(&["Player ID"]));
    assert_eq!(outcome.table.row_count(), 350);
    let warning = outcome.warning.expect("fan-out should warn");
    assert!(warning.contains("200"));
    assert!(warning.contains("350"));
}

#[test]
fn sub_threshold_growth_does_not_warn() {
    // 80 rows from 50 exceeds the ratio but not the absolute floor.
    let left_rows: Vec<Vec<Cell>> = (0..50)
        .map(|i| vec![Cell::text(format!("p{i}")), Cell::text("1")])
        .collect();
    let acc = StatTable::from_rows(vec!["Player ID".to_string(), "Gls".to_string()], left_rows);
    let right_rows: Vec<Vec<Cell>> = (0..30)
        .map(|i| vec![Cell::text(format!("q{i}")), Cell::text("2")])
        .collect();
    let incoming =
        StatTable::from_rows(vec!["Player ID".to_string(), "Sh".to_string()], right_rows);

    let outcome = safe_merge(acc, incoming, &keys(&["Player ID"]));
    assert_eq!(outcome.table.row_count(), 80);
    assert!(outcome.warning.is_none());
}

#[test]
fn missing_key_cells_join_with_each_other() {
    let mut acc = StatTable::new();
    acc.set_column("Team ID", vec![Cell::text("t1"), Cell::Missing]);
    acc.set_column("Gls", vec![Cell::text("2"), Cell::text("9")]);

    let mut incoming = StatTable::new();
    incoming.set_column("Team ID", vec![Cell::Missing]);
    incoming.set_column("Sh", vec![Cell::text("4")]);

    let outcome = safe_merge(acc, incoming, &keys(&["Team ID"]));
    assert_eq!(outcome.table.row_count(), 2);
    assert_eq!(
        outcome.table.cell("Sh", 1).and_then(|c| c.as_text()),
        Some("4")
    );
}
