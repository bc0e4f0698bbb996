use crate::api::attendance::{HistoryQuery, MonthRecordResponse, MonthSelector};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee,
};
use crate::api::payroll::{
    CreatePayroll, PaginatedPayrollResponse, PayrollQuery, UpdatePayroll,
};
use crate::importer::validator::ValidationReport;
use crate::model::employee::Employee;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

This API powers an HR management service covering the day-to-day operations of a small organization.

### Key Features
- **Personnel Records**
  - Create, update, list, and view employee profiles
- **Attendance**
  - Daily check-in / check-out tracking with work-hour calculation
  - Monthly attendance workbook import (.xlsx) with schema validation,
    formula-injection sanitization, and whole-month replace semantics
- **Payroll**
  - Monthly salary records with derived net salary

### Security
Endpoints are protected using **JWT Bearer authentication**.
Sensitive operations require the **Admin** or **HR** role.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_status,
        crate::api::attendance::history,
        crate::api::attendance::import_monthly,
        crate::api::attendance::list_monthly,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::create_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls
    ),
    components(
        schemas(
            HistoryQuery,
            MonthSelector,
            MonthRecordResponse,
            ValidationReport,
            CreateEmployee,
            UpdateEmployee,
            Employee,
            EmployeeQuery,
            EmployeeListResponse,
            PaginatedPayrollResponse,
            CreatePayroll,
            UpdatePayroll,
            PayrollQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance tracking and monthly workbook import"),
        (name = "Employee", description = "Personnel record management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
