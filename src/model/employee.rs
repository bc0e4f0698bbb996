use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Personnel record as kept by the administrative staff.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "full_name": "Tran Thi Mai",
        "gender": "female",
        "date_of_birth": "12/03/1992",
        "marital_status": "married",
        "personal_phone": "+84901234567",
        "personal_email": "mai.tran@example.com",
        "personal_tax_code": "8231456790",
        "social_insurance_code": "0123456789",
        "emergency_contact": "Tran Van Binh +84987654321",
        "permanent_address": "12 Ly Thuong Kiet, Hoan Kiem, Ha Noi",
        "current_address": "45 Nguyen Trai, Thanh Xuan, Ha Noi",
        "id_card_number": "001192012345",
        "id_card_issue_date": "15/06/2021",
        "id_card_issue_place": "Cuc CSQLHC ve TTXH"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Tran Thi Mai")]
    pub full_name: String,

    /// "male" or "female"
    #[schema(example = "female", nullable = true)]
    pub gender: Option<String>,

    /// dd/mm/yyyy, as written on the ID card
    #[schema(example = "12/03/1992", nullable = true)]
    pub date_of_birth: Option<String>,

    #[schema(example = "married", nullable = true)]
    pub marital_status: Option<String>,

    #[schema(example = "+84901234567")]
    pub personal_phone: String,

    #[schema(example = "mai.tran@example.com")]
    pub personal_email: String,

    #[schema(nullable = true)]
    pub personal_tax_code: Option<String>,

    #[schema(nullable = true)]
    pub social_insurance_code: Option<String>,

    #[schema(nullable = true)]
    pub emergency_contact: Option<String>,

    #[schema(nullable = true)]
    pub permanent_address: Option<String>,

    #[schema(nullable = true)]
    pub current_address: Option<String>,

    #[schema(example = "001192012345")]
    pub id_card_number: String,

    /// dd/mm/yyyy
    #[schema(example = "15/06/2021")]
    pub id_card_issue_date: String,

    #[schema(example = "Cuc CSQLHC ve TTXH")]
    pub id_card_issue_place: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}
