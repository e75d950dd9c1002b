use std::collections::HashMap;

use crate::merge::{PLAYER_ID_COL, TEAM_ID_COL};
use crate::table::{Cell, StatTable};

/// Attach an identifier column by looking each row's `name_col` value up in
/// `ids`. No-op when the map is empty or the name column is absent; names
/// without a mapping yield a missing cell.
pub fn add_id_column(
    table: &mut StatTable,
    ids: &HashMap<String, String>,
    name_col: &str,
    id_col: &str,
) {
    if ids.is_empty() {
        return;
    }
    let Some(names) = table.column(name_col) else {
        return;
    };
    let values: Vec<Cell> = names
        .values
        .iter()
        .map(|cell| {
            cell.as_text()
                .and_then(|name| ids.get(name))
                .map(|id| Cell::text(id.clone()))
                .unwrap_or(Cell::Missing)
        })
        .collect();
    table.set_column(id_col, values);
}

/// Assign a `Team ID` to every player row from the per-row (player id,
/// team id) pairs extracted alongside the table.
///
/// When the pairs that carry a player id line up 1:1 with the table rows,
/// team ids are assigned strictly by position, which keeps multi-team
/// players (one row per squad) correct. On a count mismatch the assignment
/// falls back to a player-id keyed lookup built from the valid pairs. The
/// fallback is lossy: a player id seen with several teams keeps the first
/// pairing, so every row of a mid-season transfer gets that one team. The
/// returned diagnostic reports the degradation so the caller can surface it.
pub fn add_team_id_column(
    table: &mut StatTable,
    pairs: &[(Option<String>, Option<String>)],
) -> Option<String> {
    if pairs.is_empty() {
        return None;
    }

    let valid: Vec<(&String, Option<&String>)> = pairs
        .iter()
        .filter_map(|(pid, tid)| pid.as_ref().map(|pid| (pid, tid.as_ref())))
        .collect();

    if valid.len() == table.row_count() {
        let values: Vec<Cell> = valid
            .iter()
            .map(|(_, tid)| tid.map(|t| Cell::text(t.clone())).unwrap_or(Cell::Missing))
            .collect();
        table.set_column(TEAM_ID_COL, values);
        return None;
    }

    // Row alignment is off; map through player ids instead. First pairing
    // per player id wins.
    let mut by_player: HashMap<&str, &str> = HashMap::new();
    for (pid, tid) in &valid {
        if let Some(tid) = tid {
            by_player.entry(pid.as_str()).or_insert(tid.as_str());
        }
    }

    let diagnostic = format!(
        "player rows ({}) did not line up with extracted id pairs ({}); \
         team ids assigned by player id, multi-team players collapse to their first squad",
        table.row_count(),
        valid.len()
    );

    let Some(player_ids) = table.column(PLAYER_ID_COL) else {
        return Some(diagnostic);
    };
    let values: Vec<Cell> = player_ids
        .values
        .iter()
        .map(|cell| {
            cell.as_text()
                .and_then(|pid| by_player.get(pid))
                .map(|tid| Cell::text(*tid))
                .unwrap_or(Cell::Missing)
        })
        .collect();
    table.set_column(TEAM_ID_COL, values);
    Some(diagnostic)
}
