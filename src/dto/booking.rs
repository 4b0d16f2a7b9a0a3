use chrono::NaiveDate;
use serde::Serialize;

/// Key of one slot fetch. Two queries are equal iff they would hit the same
/// backend resource with the same parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotQuery {
    pub salon_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub employee_id: Option<i64>,
    pub is_sub_service: bool,
}

impl SlotQuery {
    pub fn path(&self) -> String {
        format!(
            "users/salons/{}/services/{}/available-times",
            self.salon_id, self.service_id
        )
    }

    pub fn params(&self) -> SlotParams {
        SlotParams {
            date: self.date.format("%Y-%m-%d").to_string(),
            employee_id: self.employee_id,
            is_sub_service: u8::from(self.is_sub_service),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SlotParams {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    pub is_sub_service: u8,
}

#[derive(Debug, Serialize)]
pub struct EmployeeParams {
    pub is_sub_service: u8,
}
