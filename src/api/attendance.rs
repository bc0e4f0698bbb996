use crate::auth::auth::AuthUser;
use crate::importer::extract::extract_rows;
use crate::importer::persist::replace_month;
use crate::importer::sheet::SheetGrid;
use crate::importer::validator::{ValidationReport, validate_sheet};
use crate::importer::parse_month_param;
use crate::model::attendance::{Attendance, AttendanceMonthRecord};
use actix_web::{HttpResponse, Responder, error::ErrorBadRequest, web};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, check_in)
        VALUES (?, CURDATE(), CURTIME())
        "#,
    )
    .bind(employee_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully"
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = CURTIME(),
            work_hours = ROUND(TIME_TO_SEC(TIMEDIFF(CURTIME(), check_in)) / 3600, 2)
        WHERE employee_id = ?
        AND date = CURDATE()
        AND check_out IS NULL
        "#,
    )
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/// Today's attendance status
#[utoipa::path(
    get,
    path = "/api/v1/attendance/status",
    responses(
        (status = 200, description = "Current status for today", body = Object, example = json!({
            "status": "checked_in",
            "check_in": "08:58:12"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let record = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, date, check_in, check_out, work_hours
        FROM attendance
        WHERE employee_id = ? AND date = CURDATE()
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch attendance status");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let body = match record {
        None => serde_json::json!({ "status": "not_checked_in" }),
        Some(rec) if rec.check_out.is_none() => serde_json::json!({
            "status": "checked_in",
            "check_in": rec.check_in,
        }),
        Some(rec) => serde_json::json!({
            "status": "checked_out",
            "check_in": rec.check_in,
            "check_out": rec.check_out,
            "work_hours": rec.work_hours,
        }),
    };

    Ok(HttpResponse::Ok().json(body))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Inclusive range start, YYYY-MM-DD. Defaults to 30 days ago.
    #[param(value_type = String, format = "date")]
    #[schema(value_type = String, format = "date")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end, YYYY-MM-DD. Defaults to today.
    #[param(value_type = String, format = "date")]
    #[schema(value_type = String, format = "date")]
    pub end_date: Option<NaiveDate>,
}

/// Attendance history for the authenticated employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Attendance records in range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let end_date = query.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start_date = query
        .start_date
        .unwrap_or_else(|| end_date - Duration::days(30));

    if start_date > end_date {
        return Err(ErrorBadRequest("start_date cannot be after end_date"));
    }

    let records = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_id, date, check_in, check_out, work_hours
        FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        ORDER BY date DESC
        "#,
    )
    .bind(employee_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch attendance history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "history": records,
        "start_date": start_date,
        "end_date": end_date,
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthSelector {
    /// Target month, formatted YYYY-MM
    #[param(example = "2024-02")]
    pub month: Option<String>,
}

fn resolve_month(selector: &MonthSelector) -> actix_web::Result<(i32, u32)> {
    let raw = selector
        .month
        .as_deref()
        .ok_or_else(|| ErrorBadRequest("month query parameter is required (YYYY-MM)"))?;

    parse_month_param(raw).ok_or_else(|| ErrorBadRequest("month must be formatted YYYY-MM"))
}

/// Monthly workbook import. Replaces all stored attendance for the target
/// month with the uploaded workbook's contents.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/import",
    params(MonthSelector),
    request_body(
        content = Vec<u8>,
        description = "Attendance workbook (.xlsx), raw bytes",
        content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    ),
    responses(
        (status = 200, description = "Month imported", body = Object, example = json!({
            "message": "Attendance imported",
            "year": 2024,
            "month": 2,
            "rows_imported": 18,
            "warnings": []
        })),
        (status = 400, description = "Missing month selector or unreadable workbook"),
        (status = 422, description = "Workbook failed schema validation", body = ValidationReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Import failed, nothing was committed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn import_monthly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthSelector>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let (year, month) = resolve_month(&query)?;

    if body.is_empty() {
        return Err(ErrorBadRequest("request body must contain a workbook"));
    }

    let sheet = match SheetGrid::from_xlsx_bytes(&body) {
        Ok(s) => s,
        Err(e) => {
            info!(error = %e, year, month, "Rejected unreadable workbook");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Could not read workbook; expected an .xlsx file",
                "details": e.to_string(),
            })));
        }
    };

    let report = validate_sheet(&sheet, year, month);
    if !report.valid {
        info!(
            year,
            month,
            errors = report.errors.len(),
            "Workbook failed validation"
        );
        return Ok(HttpResponse::UnprocessableEntity().json(report));
    }

    let rows = extract_rows(&sheet, year, month);

    match replace_month(pool.get_ref(), year, month, &rows).await {
        Ok(rows_imported) => {
            info!(year, month, rows_imported, "Attendance month imported");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Attendance imported",
                "year": year,
                "month": month,
                "rows_imported": rows_imported,
                "warnings": report.warnings,
            })))
        }
        Err(e) => {
            error!(error = %e, year, month, "Attendance import failed, rolled back");
            Err(actix_web::error::ErrorInternalServerError(
                "Import failed; no partial data was committed",
            ))
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MonthRecordResponse {
    #[schema(example = "E001")]
    pub employee_no: String,
    #[schema(example = "Nguyen Van An")]
    pub employee_name: String,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 2)]
    pub month: u32,
    #[schema(example = json!(["P", "P", "X"]))]
    pub daily_attendance: Vec<String>,
    #[schema(value_type = Object)]
    pub other_data: serde_json::Value,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceMonthRecord> for MonthRecordResponse {
    fn from(rec: AttendanceMonthRecord) -> Self {
        let daily_attendance = if rec.daily_attendance.is_empty() {
            Vec::new()
        } else {
            rec.daily_attendance.split(',').map(str::to_owned).collect()
        };
        let other_data = serde_json::from_str(&rec.other_data)
            .unwrap_or_else(|_| serde_json::json!({}));

        Self {
            employee_no: rec.employee_no,
            employee_name: rec.employee_name,
            year: rec.year,
            month: rec.month,
            daily_attendance,
            other_data,
            created_at: rec.created_at,
        }
    }
}

/// Imported monthly records for one month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/monthly",
    params(MonthSelector),
    responses(
        (status = 200, description = "Imported records for the month", body = Object, example = json!({
            "year": 2024,
            "month": 2,
            "records": []
        })),
        (status = 400, description = "Missing or malformed month selector"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_monthly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthSelector>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let (year, month) = resolve_month(&query)?;

    let records = sqlx::query_as::<_, AttendanceMonthRecord>(
        r#"
        SELECT id, employee_no, employee_name, year, month, daily_attendance, other_data, created_at
        FROM attendance_monthly
        WHERE year = ? AND month = ?
        ORDER BY id
        "#,
    )
    .bind(year)
    .bind(month)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, year, month, "Failed to fetch monthly records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let records: Vec<MonthRecordResponse> =
        records.into_iter().map(MonthRecordResponse::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "year": year,
        "month": month,
        "records": records,
    })))
}
