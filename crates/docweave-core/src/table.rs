//! Tables built from a header row and records of scalar values

use std::fmt;

use docweave_ooxml::Docx;
use serde::{Deserialize, Serialize};

/// A scalar table value.
///
/// Deserializes from any JSON/TOML scalar. Its `Display` form is what lands in
/// the cell: text as-is, numbers in Rust's default formatting, booleans as
/// `true`/`false` and null as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n.into())
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// A table component: one header row plus one row per record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableComponent {
    /// Column titles
    pub headers: Vec<String>,
    /// Records, one per data row
    #[serde(default)]
    pub data: Vec<Vec<CellValue>>,
}

impl TableComponent {
    /// Create a table from headers and records
    pub fn new<H, R, V>(headers: H, data: impl IntoIterator<Item = R>) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            data: data
                .into_iter()
                .map(|record| record.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append the table to a document.
    ///
    /// The table has `headers.len()` columns. Values past the last column are
    /// dropped and short records leave their trailing cells empty.
    pub fn attach(&self, docx: &mut Docx) {
        let cols = self.headers.len();
        let table = docx.add_table(1, cols);

        for (i, header) in self.headers.iter().enumerate() {
            if let Some(cell) = table.cell_mut(0, i) {
                cell.set_text(header.as_str());
            }
        }

        for record in &self.data {
            let row = table.add_row();
            for (cell, value) in row.cells.iter_mut().zip(record) {
                cell.set_text(value.to_string());
            }
        }
    }
}
