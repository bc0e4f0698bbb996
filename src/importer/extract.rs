use std::collections::BTreeMap;

use crate::importer::sheet::{SheetGrid, days_in_month, sanitize_cell};
use crate::importer::{AUX_COLUMNS, HEADER_ROWS, MAX_DATA_ROWS};

/// One employee's month of attendance as read from the workbook, before it
/// is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    pub employee_no: String,
    pub employee_name: String,
    /// One sanitized value per calendar day, index 0 = day 1.
    pub daily_attendance: Vec<String>,
    /// Trailing auxiliary columns keyed by synthetic label `col_<n>`.
    pub other_data: BTreeMap<String, String>,
}

/// Flattens the data region of a validated sheet into per-employee rows.
///
/// Rows past the 25-row cap are never read. Fully empty rows are skipped.
/// A blank employee number gets a positional placeholder (`EMP_001` for row
/// 5 and so on); the placeholder is unique within one import but is not
/// stable across re-imports if the row order changes.
pub fn extract_rows(sheet: &SheetGrid, year: i32, month: u32) -> Vec<MonthRow> {
    let days = days_in_month(year, month);
    let expected_columns = 2 + days + AUX_COLUMNS;

    let first = HEADER_ROWS + 1;
    let last = sheet.rows().min(HEADER_ROWS + MAX_DATA_ROWS);

    let mut out = Vec::new();

    for row in first..=last {
        if sheet.is_row_empty(row, expected_columns) {
            continue;
        }

        let mut employee_no = sanitized(sheet, row, 1);
        if employee_no.is_empty() {
            employee_no = fallback_employee_no(row);
        }

        let employee_name = sanitized(sheet, row, 2);

        let daily_attendance = (3..=2 + days)
            .map(|col| sanitized(sheet, row, col))
            .collect();

        let mut other_data = BTreeMap::new();
        for col in (2 + days + 1)..=expected_columns {
            other_data.insert(format!("col_{col}"), sanitized(sheet, row, col));
        }

        out.push(MonthRow {
            employee_no,
            employee_name,
            daily_attendance,
            other_data,
        });
    }

    out
}

/// Placeholder employee number for rows that come without one, derived from
/// the row's position among the data rows.
fn fallback_employee_no(row: u32) -> String {
    format!("EMP_{:03}", row - HEADER_ROWS)
}

fn sanitized(sheet: &SheetGrid, row: u32, col: u32) -> String {
    sheet.cell(row, col).map(sanitize_cell).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_sheet(days: u32) -> SheetGrid {
        SheetGrid::new(5, 2 + days + AUX_COLUMNS)
    }

    #[test]
    fn blank_employee_no_gets_positional_placeholder() {
        let mut grid = base_sheet(31);
        grid.set(5, 2, "Nguyen Van An");

        let rows = extract_rows(&grid, 2024, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_no, "EMP_001");
        assert_eq!(rows[0].employee_name, "Nguyen Van An");
    }

    #[test]
    fn placeholder_follows_row_position_not_sequence() {
        let mut grid = base_sheet(31);
        grid.set(5, 1, "E001");
        grid.set(5, 2, "First");
        grid.set(7, 2, "Third"); // row 6 left empty, row 7 has no number

        let rows = extract_rows(&grid, 2024, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].employee_no, "EMP_003");
    }

    #[test]
    fn daily_attendance_length_follows_calendar() {
        let mut grid = base_sheet(31);
        grid.set(5, 1, "E001");
        grid.set(5, 2, "Someone");
        grid.set(5, 3, "P"); // day 1
        grid.set(5, 31, "X"); // day 29

        let feb_leap = extract_rows(&grid, 2024, 2);
        assert_eq!(feb_leap[0].daily_attendance.len(), 29);
        assert_eq!(feb_leap[0].daily_attendance[0], "P");
        assert_eq!(feb_leap[0].daily_attendance[28], "X");

        let feb = extract_rows(&grid, 2023, 2);
        assert_eq!(feb[0].daily_attendance.len(), 28);

        let jan = extract_rows(&grid, 2024, 1);
        assert_eq!(jan[0].daily_attendance.len(), 31);
    }

    #[test]
    fn every_text_field_is_sanitized() {
        let mut grid = base_sheet(31);
        grid.set(5, 1, "=E001");
        grid.set(5, 2, "+Nguyen");
        grid.set(5, 3, "=1+1");
        grid.set(5, 34, "@note"); // first auxiliary column for January

        let rows = extract_rows(&grid, 2024, 1);
        assert_eq!(rows[0].employee_no, "E001");
        assert_eq!(rows[0].employee_name, "Nguyen");
        assert_eq!(rows[0].daily_attendance[0], "1+1");
        assert_eq!(rows[0].other_data["col_34"], "note");
    }

    #[test]
    fn other_data_covers_trailing_columns() {
        let mut grid = base_sheet(30);
        grid.set(5, 1, "E001");
        grid.set(5, 2, "Someone");
        grid.set(5, 33, "2"); // overtime column for a 30-day month
        grid.set(5, 59, "ok"); // last expected column

        let rows = extract_rows(&grid, 2024, 4);
        let other = &rows[0].other_data;
        assert_eq!(other.len() as u32, AUX_COLUMNS);
        assert_eq!(other["col_33"], "2");
        assert_eq!(other["col_59"], "ok");
        assert_eq!(other["col_40"], "");
    }

    #[test]
    fn rows_below_cap_are_never_read() {
        let mut grid = base_sheet(31);
        for r in 5..=30 {
            grid.set(r, 1, format!("E{r:03}"));
            grid.set(r, 2, "Someone");
        }

        let rows = extract_rows(&grid, 2024, 1);
        assert_eq!(rows.len(), 25);
        assert_eq!(rows.last().unwrap().employee_no, "E029");
    }

    #[test]
    fn missing_cells_become_empty_strings() {
        let mut grid = base_sheet(31);
        grid.set(5, 1, "E001");
        grid.set(5, 2, "Someone");

        let rows = extract_rows(&grid, 2024, 1);
        assert!(rows[0].daily_attendance.iter().all(String::is_empty));
        assert!(rows[0].other_data.values().all(String::is_empty));
    }
}
