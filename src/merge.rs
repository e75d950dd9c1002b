use std::collections::{HashMap, HashSet};

use crate::table::{Cell, Column, StatTable};

pub const PLAYER_COL: &str = "Player";
pub const SQUAD_COL: &str = "Squad";
pub const PLAYER_ID_COL: &str = "Player ID";
pub const TEAM_ID_COL: &str = "Team ID";

/// Suffix given to right-side columns whose names collide in a merge.
pub const DUPLICATE_SUFFIX: &str = "_duplicate";

const FAN_OUT_RATIO: f64 = 1.5;
const FAN_OUT_MIN_ROWS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Player,
}

/// Pick the best join key the table can offer.
///
/// Teams join on `Team ID` when present (stable across stat categories),
/// falling back to the squad name. Players join on `Player ID` plus
/// `Team ID` so a mid-season transfer keeps one row per squad, falling back
/// to name plus squad name when no ids were extracted. An empty result means
/// there is no viable key and the caller must decide what to do.
pub fn merge_keys(table: &StatTable, kind: EntityKind) -> Vec<String> {
    match kind {
        EntityKind::Team => {
            if table.has_column(TEAM_ID_COL) {
                vec![TEAM_ID_COL.to_string()]
            } else if table.has_column(SQUAD_COL) {
                vec![SQUAD_COL.to_string()]
            } else {
                Vec::new()
            }
        }
        EntityKind::Player => {
            let mut keys: Vec<String> = [PLAYER_ID_COL, TEAM_ID_COL]
                .iter()
                .filter(|k| table.has_column(k))
                .map(|k| k.to_string())
                .collect();
            if keys.is_empty() {
                keys = [PLAYER_COL, SQUAD_COL]
                    .iter()
                    .filter(|k| table.has_column(k))
                    .map(|k| k.to_string())
                    .collect();
            }
            keys
        }
    }
}

#[derive(Debug)]
pub struct MergeOutcome {
    pub table: StatTable,
    /// Set when the join fanned out past the safety thresholds. Non-fatal;
    /// the result is still produced and the caller decides how loudly to
    /// report it.
    pub warning: Option<String>,
}

impl MergeOutcome {
    fn clean(table: StatTable) -> Self {
        MergeOutcome {
            table,
            warning: None,
        }
    }
}

/// Full outer join of `right` into `left` on `keys`, built to never produce
/// a cartesian product:
///
/// - an empty side short-circuits to the other side unchanged;
/// - keys are restricted to columns present in both tables, and when none
///   remain the right table is dropped entirely (intentional degradation,
///   not an error);
/// - the right side is deduplicated on the key tuple first, keeping the
///   first occurrence;
/// - colliding right-side non-key column names get [`DUPLICATE_SUFFIX`].
///
/// Left rows keep their order; right-only rows are appended after them.
pub fn safe_merge(left: StatTable, mut right: StatTable, keys: &[String]) -> MergeOutcome {
    if left.is_empty() {
        return MergeOutcome::clean(right);
    }
    if right.is_empty() {
        return MergeOutcome::clean(left);
    }

    let keys: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|k| left.has_column(k) && right.has_column(k))
        .collect();
    if keys.is_empty() {
        return MergeOutcome::clean(left);
    }

    dedup_on_keys(&mut right, &keys);

    // First occurrence per key tuple; unique after dedup.
    let mut right_index: HashMap<Vec<String>, usize> = HashMap::new();
    for row in 0..right.row_count() {
        right_index.entry(key_tuple(&right, &keys, row)).or_insert(row);
    }

    let left_rows = left.row_count();
    let matches: Vec<Option<usize>> = (0..left_rows)
        .map(|row| right_index.get(&key_tuple(&left, &keys, row)).copied())
        .collect();
    let matched: HashSet<usize> = matches.iter().flatten().copied().collect();
    let right_only: Vec<usize> = (0..right.row_count())
        .filter(|row| !matched.contains(row))
        .collect();

    let mut merged = StatTable::new();
    for col in left.columns() {
        let mut values = col.values.clone();
        for &row in &right_only {
            // Key columns carry the right-side key; everything else from the
            // left is absent for a right-only row.
            if keys.contains(&col.name.as_str()) {
                values.push(right.cell(&col.name, row).cloned().unwrap_or(Cell::Missing));
            } else {
                values.push(Cell::Missing);
            }
        }
        merged.push_column(Column {
            name: col.name.clone(),
            values,
        });
    }

    for col in right.columns() {
        if keys.contains(&col.name.as_str()) {
            continue;
        }
        let name = if left.has_column(&col.name) {
            format!("{}{DUPLICATE_SUFFIX}", col.name)
        } else {
            col.name.clone()
        };
        let mut values: Vec<Cell> = matches
            .iter()
            .map(|hit| match hit {
                Some(row) => col.values.get(*row).cloned().unwrap_or(Cell::Missing),
                None => Cell::Missing,
            })
            .collect();
        for &row in &right_only {
            values.push(col.values.get(row).cloned().unwrap_or(Cell::Missing));
        }
        merged.push_column(Column { name, values });
    }

    let merged_rows = merged.row_count();
    let warning = (merged_rows as f64 > left_rows as f64 * FAN_OUT_RATIO
        && merged_rows > FAN_OUT_MIN_ROWS)
        .then(|| {
            format!(
                "merge increased rows from {left_rows} to {merged_rows} on keys {keys:?}; \
                 join keys were not unique"
            )
        });

    MergeOutcome {
        table: merged,
        warning,
    }
}

/// Drop every column carrying the merge-collision suffix.
pub fn strip_duplicate_columns(table: &mut StatTable) {
    table.retain_columns(|name| !name.contains(DUPLICATE_SUFFIX));
}

fn dedup_on_keys(table: &mut StatTable, keys: &[&str]) {
    let mut seen = HashSet::new();
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| seen.insert(key_tuple(table, keys, row)))
        .collect();
    if keep.iter().all(|k| *k) {
        return;
    }
    table.retain_rows(|idx| keep[idx]);
}

fn key_tuple(table: &StatTable, keys: &[&str], row: usize) -> Vec<String> {
    keys.iter()
        .map(|k| {
            table
                .cell(k, row)
                .map(Cell::key_repr)
                .unwrap_or_default()
        })
        .collect()
}
