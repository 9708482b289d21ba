//! Workbook parsing
//!
//! [`WorkbookParser`] is the seam between the loader and the actual file
//! format. The production parser reads `.xlsx` workbooks with calamine and
//! converts every sheet, in workbook order.

use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

use crate::dataset::{CellValue, ParsedDataset, Table};
use crate::error::{Error, Result};

/// Parses raw workbook content into a dataset
pub trait WorkbookParser: Send + Sync {
    /// Parse every sheet of `content`
    fn parse(&self, content: &[u8]) -> Result<ParsedDataset>;
}

/// Parser for Office Open XML workbooks (`.xlsx`)
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxParser;

impl WorkbookParser for XlsxParser {
    fn parse(&self, content: &[u8]) -> Result<ParsedDataset> {
        if content.is_empty() {
            return Err(Error::EmptyContent);
        }

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))?;
        let names = workbook.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());

        for name in names {
            let range = workbook.worksheet_range(&name)?;
            let grid: Vec<Vec<CellValue>> = range
                .rows()
                .map(|row| row.iter().map(CellValue::from).collect())
                .collect();
            let table = Table::from_grid(grid);
            debug!(
                sheet = %name,
                rows = table.row_count(),
                columns = table.column_count(),
                "Parsed sheet"
            );
            sheets.push((name, table));
        }

        Ok(ParsedDataset::from_sheets(sheets))
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => Self::Empty,
            Data::Bool(v) => Self::Bool(*v),
            Data::Int(v) => Self::Int(*v),
            Data::Float(v) => Self::Float(*v),
            Data::String(v) => Self::Text(v.clone()),
            Data::DateTime(v) => Self::DateTime(v.as_f64()),
            Data::DateTimeIso(v) | Data::DurationIso(v) => Self::Text(v.clone()),
            Data::Error(e) => Self::Error(e.to_string()),
        }
    }
}
