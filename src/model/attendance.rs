use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One day of check-in/check-out tracking for a single employee.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub work_hours: Option<f64>,
}

/// One imported month of attendance for a single employee, as loaded from
/// the uploaded workbook. `daily_attendance` is stored comma-joined (one
/// value per calendar day, in day order) and `other_data` as a JSON object
/// keyed by synthetic column label.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceMonthRecord {
    pub id: u64,
    pub employee_no: String,
    pub employee_name: String,
    pub year: i32,
    pub month: u32,
    pub daily_attendance: String,
    pub other_data: String,
    pub created_at: DateTime<Utc>,
}
