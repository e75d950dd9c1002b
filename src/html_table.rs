use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::table::{Cell, StatTable};

static HEAD_ROW: Lazy<Selector> = Lazy::new(|| sel("thead tr"));
static BODY_ROW: Lazy<Selector> = Lazy::new(|| sel("tbody tr"));
static ANY_CELL: Lazy<Selector> = Lazy::new(|| sel("th, td"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector should parse")
}

/// Parse an fbref stats `<table>` into a [`StatTable`].
///
/// Two-row heads are flattened into single-level column names, repeated
/// in-page header rows are dropped, and empty cell text becomes a missing
/// value. A table with no body rows yields an empty table, never an error.
pub fn parse_table(table: ElementRef) -> StatTable {
    let head_rows: Vec<ElementRef> = table.select(&HEAD_ROW).collect();

    let names = match head_rows.as_slice() {
        [] => Vec::new(),
        [single] => row_labels(*single),
        [top, .., bottom] => flatten_columns(&group_labels(*top), &row_labels(*bottom)),
    };
    if names.is_empty() {
        return StatTable::new();
    }

    let mut rows = Vec::new();
    for row in table.select(&BODY_ROW) {
        if is_inline_header_row(row) {
            continue;
        }
        let cells: Vec<Cell> = row
            .select(&ANY_CELL)
            .map(|cell| {
                let text = cell_text(cell);
                if text.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Text(text)
                }
            })
            .collect();
        rows.push(cells);
    }

    let mut out = StatTable::from_rows(names, rows);
    strip_repeated_header_rows(&mut out);
    out
}

/// Flatten a two-level header into single names: a placeholder group label
/// contributes nothing, otherwise the group label and sub-label are joined
/// with a space. Missing group slots (top row shorter than the bottom row)
/// count as placeholders.
pub fn flatten_columns(groups: &[String], subs: &[String]) -> Vec<String> {
    subs.iter()
        .enumerate()
        .map(|(idx, sub)| {
            let group = groups.get(idx).map(String::as_str).unwrap_or("");
            if is_placeholder_group(group) {
                sub.clone()
            } else {
                format!("{group} {sub}").trim().to_string()
            }
        })
        .collect()
}

/// Drop rows whose `Rk` value is the literal string "Rk" -- repeated in-page
/// header rows that were parsed as data. No-op when there is no `Rk` column.
pub fn strip_repeated_header_rows(table: &mut StatTable) {
    let Some(rk) = table.column("Rk") else {
        return;
    };
    let keep: Vec<bool> = rk
        .values
        .iter()
        .map(|cell| cell.as_text() != Some("Rk"))
        .collect();
    if keep.iter().all(|k| *k) {
        return;
    }
    table.retain_rows(|idx| keep[idx]);
}

fn is_placeholder_group(label: &str) -> bool {
    label.trim().is_empty() || label.contains("Unnamed")
}

/// Section-header rows repeated inside tbody carry a "thead"-style class.
pub(crate) fn is_inline_header_row(row: ElementRef) -> bool {
    row.value()
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c.contains("thead")))
}

fn row_labels(row: ElementRef) -> Vec<String> {
    row.select(&ANY_CELL).map(cell_text).collect()
}

/// Top header row labels, expanded by colspan so they line up positionally
/// with the sub-label row.
fn group_labels(row: ElementRef) -> Vec<String> {
    let mut labels = Vec::new();
    for cell in row.select(&ANY_CELL) {
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let text = cell_text(cell);
        for _ in 0..span {
            labels.push(text.clone());
        }
    }
    labels
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
