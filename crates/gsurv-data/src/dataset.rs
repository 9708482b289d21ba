//! Parsed dataset types
//!
//! A [`ParsedDataset`] is an ordered mapping from sheet name to [`Table`].
//! Tables keep the header row as column names and store rows positionally;
//! [`Row`] gives the column-name view of a single row.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value
    Empty,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Date or time as a spreadsheet serial number
    DateTime(f64),
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Whether the cell holds no value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric view of the cell, if it has one
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) | Self::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view of the cell, if it is text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) | Self::DateTime(v) => write!(f, "{v}"),
            Self::Text(v) | Self::Error(v) => f.write_str(v),
        }
    }
}

/// Tabular data read from one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from a raw cell grid whose first row is the header.
    ///
    /// Empty header cells become `Unnamed: {index}` and repeated names get a
    /// `.{n}` suffix. Short rows are padded with [`CellValue::Empty`].
    #[must_use]
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(header) = grid.next() else {
            return Self::default();
        };

        let body: Vec<Vec<CellValue>> = grid.collect();
        let width = body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let columns = header_names(&header, width);
        let rows = body
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Column names in sheet order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows (header excluded)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate the values of one column
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }
}

fn header_names(header: &[CellValue], width: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(width);

    for index in 0..width {
        let name = match header.get(index) {
            None | Some(CellValue::Empty) => format!("Unnamed: {index}"),
            Some(cell) => cell.to_string(),
        };

        let mut candidate = name.clone();
        if used.contains(&candidate) {
            let count = counts.entry(name.clone()).or_insert(0);
            loop {
                *count += 1;
                candidate = format!("{name}.{count}");
                if !used.contains(&candidate) {
                    break;
                }
            }
        }
        used.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

/// Column-name view over one table row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Value of the named column
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.cells.get(index)
    }

    /// Values in column order
    #[must_use]
    pub fn values(&self) -> &'a [CellValue] {
        self.cells
    }

    /// Iterate `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter())
    }

    /// Owned column-name mapping
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, CellValue> {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// A workbook parsed into named tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDataset {
    sheets: Vec<(String, Table)>,
}

impl ParsedDataset {
    /// Build from sheets in workbook order
    #[must_use]
    pub fn from_sheets(sheets: Vec<(String, Table)>) -> Self {
        Self { sheets }
    }

    /// Table for a sheet name
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, table)| table)
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate `(name, table)` pairs in workbook order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Number of sheets
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the workbook had no sheets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Shape of every sheet
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            sheets: self
                .sheets
                .iter()
                .map(|(name, table)| SheetSummary {
                    name: name.clone(),
                    rows: table.row_count(),
                    columns: table.columns().to_vec(),
                })
                .collect(),
        }
    }
}

/// Shape of a dataset, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Per-sheet shapes in workbook order
    pub sheets: Vec<SheetSummary>,
}

/// Shape of one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    /// Sheet name
    pub name: String,
    /// Number of data rows
    pub rows: usize,
    /// Column names
    pub columns: Vec<String>,
}

impl fmt::Display for SheetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} rows x {} columns)",
            self.name,
            self.rows,
            self.columns.len()
        )
    }
}
