use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddToCartRequest {
    pub salon_id: i64,
    pub service_id: i64,
    pub is_sub_service: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct CheckoutRequest {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub appointment_ids: Vec<i64>,
}
