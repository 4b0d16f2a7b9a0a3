use crate::{
    booking::{flow::BookingTarget, slots::sort_slots},
    client::{ApiClient, Auth},
    dto::booking::{EmployeeParams, SlotQuery},
    error::AppResult,
    models::{Employee, TimeSlot},
};

pub async fn available_employees(
    client: &ApiClient,
    target: &BookingTarget,
) -> AppResult<Vec<Employee>> {
    let path = format!(
        "users/salons/{}/services/{}/employee-available",
        target.salon_id, target.service_id
    );
    let params = EmployeeParams {
        is_sub_service: u8::from(target.is_sub_service),
    };
    let resp = client
        .get_query::<Vec<Employee>, _>(&path, &params, Auth::Required)
        .await?;
    Ok(resp.data.unwrap_or_default())
}

/// Slots for one (salon, service, date, employee) tuple, sorted by start time.
pub async fn available_times(client: &ApiClient, query: &SlotQuery) -> AppResult<Vec<TimeSlot>> {
    let resp = client
        .get_query::<Vec<TimeSlot>, _>(&query.path(), &query.params(), Auth::Required)
        .await?;
    let mut slots = resp.data.unwrap_or_default();
    sort_slots(&mut slots);
    Ok(slots)
}
