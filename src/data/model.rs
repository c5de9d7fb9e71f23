use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value of the indicator table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a data frame would infer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Numeric view of the cell. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing) || matches!(self, Cell::Number(v) if v.is_nan())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Missing => write!(f, "NaN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    /// Canonical (normalized) column name.
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }

    /// A column is numeric when it holds no text at all.
    pub fn is_numeric(&self) -> bool {
        !self.cells.iter().any(|c| matches!(c, Cell::Text(_)))
    }

    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Cell::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded indicator table
// ---------------------------------------------------------------------------

/// Column-oriented, read-only country table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from equally long columns.
    ///
    /// Short columns are padded with [`Cell::Missing`] so every column has
    /// the same number of rows.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        for col in &mut columns {
            col.cells.resize(rows, Cell::Missing);
        }
        Dataset { columns, rows }
    }

    /// Number of rows (countries).
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns a data frame would report as numeric dtypes.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// Text rendering of one cell, used for axis and legend labels.
    pub fn label(&self, name: &str, row: usize) -> Option<String> {
        self.column(name)?.cells.get(row).map(|c| c.to_string())
    }
}
