use serde::Serialize;
use utoipa::ToSchema;

use crate::importer::sheet::{SheetGrid, days_in_month};
use crate::importer::{AUX_COLUMNS, HEADER_ROWS, MAX_DATA_ROWS};

/// Outcome of checking a workbook against the monthly attendance schema.
/// `errors` keeps the order the checks run in so the client sees every
/// problem from one upload; `warnings` never fail the import on their own.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationReport {
    pub valid: bool,
    #[schema(example = json!(["Workbook must have at least 5 rows, found 2"]))]
    pub errors: Vec<String>,
    #[schema(example = json!(["Rows 7, 9 in the data region are empty"]))]
    pub warnings: Vec<String>,
    #[schema(example = 60)]
    pub expected_columns: u32,
    #[schema(example = 31)]
    pub days_in_month: u32,
    #[schema(example = 12)]
    pub data_rows_found: u32,
}

/// Validates `sheet` against the fixed workbook schema for (`year`, `month`).
///
/// The two structural checks (row count, column count) short-circuit because
/// every later check would index past the grid otherwise; all remaining
/// checks run to completion and accumulate.
pub fn validate_sheet(sheet: &SheetGrid, year: i32, month: u32) -> ValidationReport {
    let days = days_in_month(year, month);
    let expected_columns = 2 + days + AUX_COLUMNS;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let fail = |errors: Vec<String>, warnings: Vec<String>, data_rows_found: u32| ValidationReport {
        valid: false,
        errors,
        warnings,
        expected_columns,
        days_in_month: days,
        data_rows_found,
    };

    // 1. At least 4 header rows plus one data row.
    if sheet.rows() < HEADER_ROWS + 1 {
        errors.push(format!(
            "Workbook must have at least {} rows (4 header rows plus one data row), found {}",
            HEADER_ROWS + 1,
            sheet.rows()
        ));
        return fail(errors, warnings, 0);
    }

    // 2. Employee number, employee name, one column per day, auxiliary columns.
    if sheet.cols() < expected_columns {
        errors.push(format!(
            "Workbook must have at least {} columns for {}-{:02} ({} day columns plus {} fixed), found {}",
            expected_columns,
            year,
            month,
            days,
            2 + AUX_COLUMNS,
            sheet.cols()
        ));
        return fail(errors, warnings, 0);
    }

    let region_first = HEADER_ROWS + 1;
    let region_last = HEADER_ROWS + MAX_DATA_ROWS;

    // 3. No merged cells in the data region.
    for region in sheet.merged_regions() {
        if region.intersects(region_first, 1, region_last, expected_columns) {
            errors.push(format!(
                "Merged cells are not allowed in the data region (rows {}-{}): rows {}-{}, columns {}-{}",
                region_first,
                region_last,
                region.first_row,
                region.last_row,
                region.first_col,
                region.last_col
            ));
        }
    }

    // 4. No formula cells in the data region.
    let mut formula_cells = 0u32;
    let mut first_formula = None;
    for row in region_first..=region_last.min(sheet.rows()) {
        for col in 1..=expected_columns {
            if sheet.is_formula(row, col) {
                formula_cells += 1;
                first_formula.get_or_insert((row, col));
            }
        }
    }
    if let Some((row, col)) = first_formula {
        errors.push(format!(
            "Formula cells are not allowed in the data region: found {formula_cells} (first at row {row}, column {col})"
        ));
    }

    // 5. Between 1 and 25 non-empty data rows.
    let mut data_rows_found = 0u32;
    let mut empty_rows = Vec::new();
    for row in region_first..=region_last.min(sheet.rows()) {
        if sheet.is_row_empty(row, expected_columns) {
            empty_rows.push(row);
        } else {
            data_rows_found += 1;
        }
    }

    let surplus_rows = (region_last + 1..=sheet.rows())
        .filter(|&row| !sheet.is_row_empty(row, expected_columns))
        .count();
    if surplus_rows > 0 {
        errors.push(format!(
            "Too many employees: found data below row {region_last}; at most {MAX_DATA_ROWS} employee rows are supported"
        ));
    }

    if data_rows_found == 0 {
        errors.push("No employee data rows found".to_string());
    }

    if data_rows_found < MAX_DATA_ROWS && !empty_rows.is_empty() {
        let rows = empty_rows
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        warnings.push(format!("Rows {rows} in the data region are empty"));
    }

    // 6. The first data row must carry an employee number and name.
    if data_rows_found >= 1 {
        let no_blank = sheet
            .cell(region_first, 1)
            .is_none_or(|s| s.trim().is_empty());
        let name_blank = sheet
            .cell(region_first, 2)
            .is_none_or(|s| s.trim().is_empty());
        if no_blank || name_blank {
            errors.push(format!(
                "First data row (row {region_first}) must contain an employee number in column 1 and an employee name in column 2"
            ));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        expected_columns,
        days_in_month: days,
        data_rows_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::sheet::MergedRegion;

    /// 4 header rows, `n` filled data rows, correct column count for 2024-01.
    fn sheet_for_jan_2024(data_rows: u32) -> SheetGrid {
        let cols = 2 + 31 + AUX_COLUMNS; // 60
        let mut grid = SheetGrid::new(HEADER_ROWS, cols);
        for r in 1..=HEADER_ROWS {
            grid.set(r, 1, "header");
        }
        for i in 0..data_rows {
            let row = HEADER_ROWS + 1 + i;
            grid.set(row, 1, format!("E{:03}", i + 1));
            grid.set(row, 2, format!("Employee {}", i + 1));
            grid.set(row, 3, "P");
        }
        grid
    }

    #[test]
    fn too_few_rows_short_circuits() {
        let grid = SheetGrid::new(4, 60);
        let report = validate_sheet(&grid, 2024, 1);

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("at least 5 rows"));
        assert_eq!(report.data_rows_found, 0);
    }

    #[test]
    fn expected_columns_is_29_plus_days() {
        let report = validate_sheet(&sheet_for_jan_2024(1), 2024, 1);
        assert_eq!(report.expected_columns, 60);
        assert_eq!(report.days_in_month, 31);
        assert!(report.valid, "{:?}", report.errors);

        // February of a leap year needs exactly 29 + 29 columns
        let narrow = SheetGrid::new(5, 58);
        let report = validate_sheet(&narrow, 2024, 2);
        assert_eq!(report.expected_columns, 58);
        assert_eq!(report.days_in_month, 29);
        assert!(!report.errors.iter().any(|e| e.contains("columns")));
    }

    #[test]
    fn too_few_columns_short_circuits() {
        let grid = SheetGrid::new(10, 59);
        let report = validate_sheet(&grid, 2024, 1);

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("at least 60 columns"));
    }

    #[test]
    fn merged_cells_in_data_region_rejected() {
        let mut grid = sheet_for_jan_2024(2);
        // header merge is fine
        grid.add_merged(MergedRegion {
            first_row: 1,
            first_col: 1,
            last_row: 4,
            last_col: 10,
        });
        assert!(validate_sheet(&grid, 2024, 1).valid);

        grid.add_merged(MergedRegion {
            first_row: 5,
            first_col: 3,
            last_row: 6,
            last_col: 3,
        });
        let report = validate_sheet(&grid, 2024, 1);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("Merged cells")));
    }

    #[test]
    fn formula_cells_in_data_region_rejected() {
        let mut grid = sheet_for_jan_2024(2);
        grid.set(6, 5, "8");
        grid.mark_formula(6, 5);

        let report = validate_sheet(&grid, 2024, 1);
        assert!(!report.valid);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("Formula cells") && e.contains("row 6"))
        );
    }

    #[test]
    fn twenty_six_data_rows_is_too_many() {
        let grid = sheet_for_jan_2024(26);
        let report = validate_sheet(&grid, 2024, 1);

        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("Too many employees")));
        // the 26th row sits below the cap and is not counted
        assert_eq!(report.data_rows_found, 25);
    }

    #[test]
    fn zero_data_rows_rejected() {
        let mut grid = SheetGrid::new(6, 60);
        grid.set(1, 1, "header");
        let report = validate_sheet(&grid, 2024, 1);

        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("No employee data rows")));
    }

    #[test]
    fn empty_rows_warn_but_do_not_fail() {
        // rows 5 and 7 hold data, row 6 is a hole in the data region
        let mut holed = sheet_for_jan_2024(0);
        for r in [5u32, 7] {
            holed.set(r, 1, "E001");
            holed.set(r, 2, "Someone");
        }

        let report = validate_sheet(&holed, 2024, 1);
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.warnings.iter().any(|w| w.contains('6')));
        assert_eq!(report.data_rows_found, 2);
    }

    #[test]
    fn first_data_row_must_identify_employee() {
        let mut grid = sheet_for_jan_2024(1);
        let report = validate_sheet(&grid, 2024, 1);
        assert!(report.valid);

        grid.set(5, 2, " ");
        let report = validate_sheet(&grid, 2024, 1);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("First data row")));
    }
}
