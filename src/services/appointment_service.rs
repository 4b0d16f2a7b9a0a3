use crate::{
    client::{ApiClient, Auth, require_data},
    dto::{
        appointments::{AppointmentQuery, ChangeTimeRequest},
        params::Pagination,
    },
    error::{AppError, AppResult},
    models::Appointment,
    response::Paginated,
};

const LOOKUP_PAGE_SIZE: i64 = 100;

pub async fn list_appointments(
    client: &ApiClient,
    query: AppointmentQuery,
) -> AppResult<Paginated<Appointment>> {
    let query = AppointmentQuery {
        pagination: query.pagination.normalize(),
        ..query
    };
    let resp = client
        .get_query::<Vec<Appointment>, _>("users/appointments", &query, Auth::Required)
        .await?;
    Ok(resp.into_page())
}

/// Walks the appointment pages until `id` turns up. The backend has no
/// single-appointment endpoint.
pub async fn find_appointment(client: &ApiClient, id: i64) -> AppResult<Appointment> {
    let mut page = 1;
    loop {
        let query = AppointmentQuery {
            pagination: Pagination {
                page: Some(page),
                per_page: Some(LOOKUP_PAGE_SIZE),
            },
            status: None,
        };
        let batch = list_appointments(client, query).await?;
        let has_more = batch.has_more();
        if let Some(appointment) = batch.items.into_iter().find(|a| a.id == id) {
            return Ok(appointment);
        }
        if !has_more {
            return Err(AppError::InvalidInput(format!(
                "Appointment #{id} was not found"
            )));
        }
        page += 1;
    }
}

pub async fn change_time(
    client: &ApiClient,
    appointment: &Appointment,
    payload: &ChangeTimeRequest,
) -> AppResult<Appointment> {
    if !appointment.can_reschedule() {
        return Err(not_allowed(appointment, "rescheduled"));
    }
    let id = appointment.id;
    let resp = client
        .put(&format!("users/appointments/{id}/change-time"), payload, Auth::Required)
        .await?;
    let appointment = require_data(resp)?;
    tracing::info!(appointment_id = id, "appointment rescheduled");
    Ok(appointment)
}

pub async fn cancel_appointment(client: &ApiClient, appointment: &Appointment) -> AppResult<()> {
    if !appointment.can_cancel() {
        return Err(not_allowed(appointment, "cancelled"));
    }
    let id = appointment.id;
    client
        .delete::<serde_json::Value>(&format!("users/appointments/{id}"), Auth::Required)
        .await?;
    tracing::info!(appointment_id = id, "appointment cancelled");
    Ok(())
}

fn not_allowed(appointment: &Appointment, action: &str) -> AppError {
    tracing::warn!(
        appointment_id = appointment.id,
        status = appointment.status.as_str(),
        "appointment action refused"
    );
    AppError::InvalidInput(format!(
        "Appointment #{} is {} and can no longer be {action}",
        appointment.id,
        appointment.status.as_str()
    ))
}
