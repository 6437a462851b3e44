//! Negative-credential rows read from a spreadsheet.
//!
//! The workbook has a header row and the columns `email`, `password`,
//! `errorMessage`; data starts at row 2. Every cell is coerced to text.

use crate::result::{FlowError, FlowResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One data row of the negative-login sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeCredentialRow {
    /// 1-based sheet row, for diagnostics
    pub row: usize,
    /// Email or username typed into the login popup (may be empty)
    pub email: String,
    /// Password (may be empty)
    pub password: String,
    /// Message the page is expected to show
    pub error_message: String,
}

/// Cells of one sheet, positioned in sheet coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    /// 1-based row number of `cells[0]`
    pub first_row: usize,
    /// 1-based column number of each row's first cell
    pub first_col: usize,
    /// Cell text, `None` for empty cells
    pub cells: Vec<Vec<Option<String>>>,
}

impl SheetRows {
    /// Cell at 1-based sheet coordinates
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        let r = row.checked_sub(self.first_row)?;
        let c = col.checked_sub(self.first_col)?;
        self.cells.get(r)?.get(c)?.as_deref()
    }

    /// 1-based number of the last row
    #[must_use]
    pub fn last_row(&self) -> usize {
        (self.first_row + self.cells.len()).saturating_sub(1)
    }
}

/// Anything that can hand out the cells of a named sheet
pub trait TabularSource {
    /// Read a whole sheet
    fn sheet(&mut self, name: &str) -> FlowResult<SheetRows>;
}

/// `.xlsx` / `.xls` / `.ods` workbook on disk
pub struct WorkbookSource {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for WorkbookSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbookSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl WorkbookSource {
    /// Open a workbook, detecting the format from the extension
    pub fn open(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = open_workbook_auto(&path).map_err(|e| FlowError::Fixture {
            message: format!("cannot open workbook {}: {e}", path.display()),
        })?;
        Ok(Self { path, workbook })
    }
}

fn cell_text(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl TabularSource for WorkbookSource {
    fn sheet(&mut self, name: &str) -> FlowResult<SheetRows> {
        if !self.workbook.sheet_names().iter().any(|s| s == name) {
            return Err(FlowError::Fixture {
                message: format!("sheet '{name}' not found in {}", self.path.display()),
            });
        }
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| FlowError::Fixture {
                message: format!("cannot read sheet '{name}': {e}"),
            })?;
        let (row0, col0) = range.start().unwrap_or((0, 0));
        Ok(SheetRows {
            first_row: row0 as usize + 1,
            first_col: col0 as usize + 1,
            cells: range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
        })
    }
}

/// In-memory sheet, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    sheets: Vec<(String, SheetRows)>,
}

impl MemoryTable {
    /// Create an empty table set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose first row is the header (sheet row 1, column A)
    #[must_use]
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<Option<&str>>>) -> Self {
        let cells = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.map(str::to_string)).collect())
            .collect();
        self.sheets.push((
            name.into(),
            SheetRows {
                first_row: 1,
                first_col: 1,
                cells,
            },
        ));
        self
    }
}

impl TabularSource for MemoryTable {
    fn sheet(&mut self, name: &str) -> FlowResult<SheetRows> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| FlowError::Fixture {
                message: format!("sheet '{name}' not found"),
            })
    }
}

/// Load every negative-credential row of `sheet` from the workbook at `path`
pub fn load_negative_credentials(
    path: impl AsRef<Path>,
    sheet: &str,
) -> FlowResult<Vec<NegativeCredentialRow>> {
    let mut source = WorkbookSource::open(path)?;
    read_negative_credentials(&mut source, sheet)
}

/// Read negative-credential rows from any tabular source, in sheet order
pub fn read_negative_credentials(
    source: &mut impl TabularSource,
    sheet: &str,
) -> FlowResult<Vec<NegativeCredentialRow>> {
    let rows = source.sheet(sheet)?;
    let mut out = Vec::new();
    for row in 2.max(rows.first_row)..=rows.last_row() {
        let email = rows.cell(row, 1);
        let password = rows.cell(row, 2);
        let message = rows.cell(row, 3).map(str::trim).filter(|m| !m.is_empty());

        let blank = |c: Option<&str>| c.map_or(true, |s| s.trim().is_empty());
        if blank(email) && blank(password) && message.is_none() {
            continue;
        }
        let error_message = message.ok_or_else(|| FlowError::InvalidFixtureRow {
            row,
            message: "missing errorMessage".to_string(),
        })?;
        out.push(NegativeCredentialRow {
            row,
            email: email.unwrap_or_default().to_string(),
            password: password.unwrap_or_default().to_string(),
            error_message: error_message.to_string(),
        });
    }
    Ok(out)
}
