use chrono::NaiveDate;
use serde::Serialize;

use crate::{dto::params::Pagination, models::AppointmentStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ChangeTimeRequest {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AppointmentQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}
