use crate::{
    client::{ApiClient, Auth},
    dto::{
        notifications::{DeviceTokenRequest, MarkReadRequest},
        params::Pagination,
    },
    error::AppResult,
    models::Notification,
    response::Paginated,
};

pub async fn list_notifications(
    client: &ApiClient,
    pagination: Pagination,
) -> AppResult<Paginated<Notification>> {
    let resp = client
        .get_query::<Vec<Notification>, _>(
            "users/notification",
            &pagination.normalize(),
            Auth::Required,
        )
        .await?;
    Ok(resp.into_page())
}

pub async fn mark_read(client: &ApiClient, ids: Vec<i64>) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    client
        .post::<serde_json::Value, _>(
            "users/notification/mark-read",
            &MarkReadRequest { ids },
            Auth::Required,
        )
        .await?;
    Ok(())
}

/// Stores the push token and, when notifications are enabled and a session
/// exists, hands it to the backend. Returns whether the backend was told.
pub async fn register_push_token(client: &ApiClient, token: &str, platform: &str) -> AppResult<bool> {
    client.preferences().set_push_token(token)?;
    if !client.preferences().notifications_enabled()? || !client.auth().is_authenticated() {
        tracing::debug!("push token stored locally only");
        return Ok(false);
    }
    client
        .post::<serde_json::Value, _>(
            "users/device-token",
            &DeviceTokenRequest {
                token: token.to_string(),
                platform: platform.to_string(),
            },
            Auth::Required,
        )
        .await?;
    Ok(true)
}
