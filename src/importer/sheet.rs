use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;

/// A merged cell block, 1-indexed, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRegion {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergedRegion {
    pub fn intersects(&self, first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> bool {
        self.first_row <= last_row
            && self.last_row >= first_row
            && self.first_col <= last_col
            && self.last_col >= first_col
    }
}

#[derive(Debug, Clone, Default)]
struct Cell {
    text: Option<String>,
    formula: bool,
}

/// In-memory snapshot of the first worksheet of an uploaded workbook.
///
/// All coordinates on the public surface are 1-indexed, matching the row and
/// column numbering the workbook schema is written in.
#[derive(Debug, Default)]
pub struct SheetGrid {
    rows: u32,
    cols: u32,
    cells: Vec<Vec<Cell>>,
    merged: Vec<MergedRegion>,
}

impl SheetGrid {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![Cell::default(); cols as usize]; rows as usize],
            merged: Vec::new(),
        }
    }

    /// Decodes the first worksheet of an `.xlsx` workbook held in memory.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).context("not a readable .xlsx workbook")?;

        workbook
            .load_merged_regions()
            .context("failed to read merged regions")?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .context("workbook has no worksheets")?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read worksheet '{sheet_name}'"))?;
        let formulas = workbook
            .worksheet_formula(&sheet_name)
            .with_context(|| format!("failed to read formulas of worksheet '{sheet_name}'"))?;

        // Grid dimensions cover both cached values and formula cells.
        let (mut rows, mut cols) = match range.end() {
            Some((r, c)) => (r + 1, c + 1),
            None => (0, 0),
        };
        if let Some((r, c)) = formulas.end() {
            rows = rows.max(r + 1);
            cols = cols.max(c + 1);
        }

        let mut grid = SheetGrid::new(rows, cols);

        for r in 0..rows {
            for c in 0..cols {
                if let Some(data) = range.get_value((r, c)) {
                    let text = cell_text(data);
                    if !text.is_empty() {
                        grid.set(r + 1, c + 1, text);
                    }
                }
                if let Some(f) = formulas.get_value((r, c)) {
                    if !f.is_empty() {
                        grid.mark_formula(r + 1, c + 1);
                    }
                }
            }
        }

        for (_, _, dims) in workbook.merged_regions_by_sheet(&sheet_name) {
            grid.add_merged(MergedRegion {
                first_row: dims.start.0 + 1,
                first_col: dims.start.1 + 1,
                last_row: dims.end.0 + 1,
                last_col: dims.end.1 + 1,
            });
        }

        Ok(grid)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Text of a cell, or `None` when the cell is absent or blank.
    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        if row == 0 || col == 0 {
            return None;
        }
        self.cells
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .and_then(|c| c.text.as_deref())
    }

    pub fn is_formula(&self, row: u32, col: u32) -> bool {
        if row == 0 || col == 0 {
            return false;
        }
        self.cells
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .is_some_and(|c| c.formula)
    }

    pub fn merged_regions(&self) -> &[MergedRegion] {
        &self.merged
    }

    /// True when no cell in `row` up to `max_col` holds non-blank text.
    pub fn is_row_empty(&self, row: u32, max_col: u32) -> bool {
        (1..=max_col).all(|col| self.cell(row, col).is_none_or(|s| s.trim().is_empty()))
    }

    pub fn set(&mut self, row: u32, col: u32, text: impl Into<String>) {
        self.grow(row, col);
        self.cells[row as usize - 1][col as usize - 1].text = Some(text.into());
    }

    pub fn mark_formula(&mut self, row: u32, col: u32) {
        self.grow(row, col);
        self.cells[row as usize - 1][col as usize - 1].formula = true;
    }

    pub fn add_merged(&mut self, region: MergedRegion) {
        self.merged.push(region);
    }

    fn grow(&mut self, row: u32, col: u32) {
        if row > self.rows {
            self.cells
                .resize(row as usize, vec![Cell::default(); self.cols as usize]);
            self.rows = row;
        }
        if col > self.cols {
            for r in &mut self.cells {
                r.resize(col as usize, Cell::default());
            }
            self.cols = col;
        }
    }
}

/// Renders a calamine cell to display text. Error cells degrade to blank so
/// a single bad cell never aborts an import.
fn cell_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_owned(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

/// Trims a cell value and strips a single leading `=`, `+`, `-` or `@` so a
/// stored value can never re-trigger as a formula when exported back into
/// spreadsheet software.
pub fn sanitize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.chars().next() {
        Some('=' | '+' | '-' | '@') => trimmed[1..].to_owned(),
        _ => trimmed.to_owned(),
    }
}

/// Number of calendar days in the given month. `month` must be 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year-month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid year-month")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("valid year-month")
    };
    next.signed_duration_since(first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_one_leading_formula_char() {
        assert_eq!(sanitize_cell("=1+1"), "1+1");
        assert_eq!(sanitize_cell("+84901234567"), "84901234567");
        assert_eq!(sanitize_cell("-5"), "5");
        assert_eq!(sanitize_cell("@SUM(A1)"), "SUM(A1)");
        // only the first character is stripped
        assert_eq!(sanitize_cell("==cmd"), "=cmd");
    }

    #[test]
    fn sanitize_trims_whitespace() {
        assert_eq!(sanitize_cell("  P  "), "P");
        assert_eq!(sanitize_cell(" =HYPERLINK(...) "), "HYPERLINK(...)");
        assert_eq!(sanitize_cell(""), "");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn grid_is_one_indexed_and_blank_safe() {
        let mut grid = SheetGrid::new(5, 3);
        grid.set(5, 1, "EMP-1");

        assert_eq!(grid.cell(5, 1), Some("EMP-1"));
        assert_eq!(grid.cell(1, 1), None);
        assert_eq!(grid.cell(0, 0), None);
        assert_eq!(grid.cell(6, 1), None); // past the grid
        assert!(grid.is_row_empty(4, 3));
        assert!(!grid.is_row_empty(5, 3));
    }

    #[test]
    fn merged_region_intersection() {
        let region = MergedRegion {
            first_row: 2,
            first_col: 1,
            last_row: 3,
            last_col: 4,
        };
        assert!(region.intersects(3, 1, 10, 40));
        assert!(!region.intersects(4, 1, 10, 40));
        assert!(!region.intersects(2, 5, 3, 9));
    }
}
