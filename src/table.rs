use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One value in a stat table. Tables start out all-text after HTML parsing;
/// whole columns are promoted to numbers by [`StatTable::coerce_numeric_columns`]
/// once assembly is finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Num(f64),
}

impl Cell {
    pub fn text(raw: impl Into<String>) -> Self {
        Cell::Text(raw.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Stable string form used as a join-key component. Missing cells share a
    /// sentinel so they compare equal to each other.
    pub(crate) fn key_repr(&self) -> String {
        match self {
            Cell::Missing => "\u{1}".to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Num(n) => n.to_string(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Missing => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            // Whole numbers come out as integers, like the source data.
            Cell::Num(n) if n.fract() == 0.0 && n.abs() < 9e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Cell::Num(n) => serializer.serialize_f64(*n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Rectangular table with named, ordered columns. Column values are text,
/// numbers or missing; nothing about the schema is assumed up front.
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    columns: Vec<Column>,
}

impl StatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from row-major data. Short rows are padded with missing cells,
    /// long rows truncated to the header width.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();
        for mut row in rows {
            row.resize(columns.len(), Cell::Missing);
            for (col, cell) in columns.iter_mut().zip(row) {
                col.values.push(cell);
            }
        }
        StatTable { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn cell(&self, name: &str, row: usize) -> Option<&Cell> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Add a column, or overwrite an existing one of the same name. The
    /// caller supplies one value per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.name == name) {
            col.values = values;
        } else {
            self.columns.push(Column {
                name: name.to_string(),
                values,
            });
        }
    }

    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Keep only rows for which the predicate (given the row index) is true.
    pub fn retain_rows(&mut self, keep: impl Fn(usize) -> bool) {
        for col in &mut self.columns {
            let mut idx = 0;
            col.values.retain(|_| {
                let keep_it = keep(idx);
                idx += 1;
                keep_it
            });
        }
    }

    pub fn retain_columns(&mut self, keep: impl Fn(&str) -> bool) {
        self.columns.retain(|c| keep(&c.name));
    }

    /// Best-effort numeric coercion, column by column: a column converts only
    /// when every non-missing cell parses as a float; otherwise it is left
    /// untouched. Never fails.
    pub fn coerce_numeric_columns(&mut self) {
        for col in &mut self.columns {
            let parsed: Option<Vec<Cell>> = col
                .values
                .iter()
                .map(|cell| match cell {
                    Cell::Missing => Some(Cell::Missing),
                    Cell::Num(n) => Some(Cell::Num(*n)),
                    Cell::Text(s) => s.trim().parse::<f64>().ok().map(Cell::Num),
                })
                .collect();
            if let Some(values) = parsed {
                col.values = values;
            }
        }
    }

}

/// Column-oriented JSON: `{"Col": {"0": v0, "1": v1, ...}}`, column order
/// preserved.
impl Serialize for StatTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for col in &self.columns {
            let rows: serde_json::Map<String, Value> = col
                .values
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    (
                        idx.to_string(),
                        serde_json::to_value(cell).unwrap_or(Value::Null),
                    )
                })
                .collect();
            map.serialize_entry(&col.name, &rows)?;
        }
        map.end()
    }
}
