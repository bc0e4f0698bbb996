use sqlx::MySqlPool;
use tracing::warn;

use crate::importer::extract::MonthRow;

/// Replaces all stored attendance for (`year`, `month`) with `rows`.
///
/// The delete and the inserts run in one transaction; a failure anywhere
/// rolls the whole month back, so a caller never observes a half-replaced
/// month. Returns the number of rows inserted.
pub async fn replace_month(
    pool: &MySqlPool,
    year: i32,
    month: u32,
    rows: &[MonthRow],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if let Err(e) = sqlx::query("DELETE FROM attendance_monthly WHERE year = ? AND month = ?")
        .bind(year)
        .bind(month)
        .execute(&mut *tx)
        .await
    {
        // A missing table means zero existing rows, not a failed import.
        if !is_missing_table(&e) {
            return Err(e);
        }
        warn!(year, month, "attendance_monthly table missing, skipping clear step");
    }

    let mut inserted = 0u64;
    for row in rows {
        let other_data = serde_json::to_string(&row.other_data).unwrap_or_else(|_| "{}".into());

        sqlx::query(
            r#"
            INSERT INTO attendance_monthly
                (employee_no, employee_name, year, month, daily_attendance, other_data)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.employee_no)
        .bind(&row.employee_name)
        .bind(year)
        .bind(month)
        .bind(row.daily_attendance.join(","))
        .bind(other_data)
        .execute(&mut *tx)
        .await?;

        inserted += 1;
    }

    tx.commit().await?;

    Ok(inserted)
}

fn is_missing_table(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("42S02"))
}
