//! Monthly attendance workbook importer.
//!
//! An uploaded workbook is decoded into a [`sheet::SheetGrid`], checked by
//! [`validator::validate_sheet`], flattened into per-employee rows by
//! [`extract::extract_rows`] and written out by [`persist::replace_month`].
//! An import always replaces the whole target month, never merges into it.

pub mod extract;
pub mod persist;
pub mod sheet;
pub mod validator;

/// Header rows reserved at the top of every attendance workbook.
pub const HEADER_ROWS: u32 = 4;

/// Hard cap on employee rows per workbook; rows below this are never read.
pub const MAX_DATA_ROWS: u32 = 25;

/// Trailing auxiliary columns (overtime, leave and similar) after the
/// per-day columns. Expected column count is `2 + days + AUX_COLUMNS`.
pub const AUX_COLUMNS: u32 = 27;

/// Parses a `YYYY-MM` month selector from the import request.
pub fn parse_month_param(raw: &str) -> Option<(i32, u32)> {
    let (y, m) = raw.trim().split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;

    if !(1..=12).contains(&month) || !(1900..=9999).contains(&year) {
        return None;
    }

    Some((year, month))
}

#[cfg(test)]
mod tests {
    use super::parse_month_param;

    #[test]
    fn month_param_accepts_year_dash_month() {
        assert_eq!(parse_month_param("2024-02"), Some((2024, 2)));
        assert_eq!(parse_month_param(" 2023-12 "), Some((2023, 12)));
        assert_eq!(parse_month_param("2023-7"), Some((2023, 7)));
    }

    #[test]
    fn month_param_rejects_garbage() {
        assert_eq!(parse_month_param("2024"), None);
        assert_eq!(parse_month_param("2024-13"), None);
        assert_eq!(parse_month_param("2024-00"), None);
        assert_eq!(parse_month_param("24-01"), None);
        assert_eq!(parse_month_param("2024/01"), None);
        assert_eq!(parse_month_param(""), None);
    }
}
