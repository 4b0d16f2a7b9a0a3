use crate::{
    client::{ApiClient, Auth, require_data},
    dto::auth::UpdateProfileRequest,
    error::{AppError, AppResult},
    models::Profile,
};

pub async fn get_profile(client: &ApiClient) -> AppResult<Profile> {
    let resp = client.get("users/profile", Auth::Required).await?;
    require_data(resp)
}

pub async fn update_profile(client: &ApiClient, payload: &UpdateProfileRequest) -> AppResult<Profile> {
    if payload.name.is_none() && payload.email.is_none() {
        return Err(AppError::InvalidInput("nothing to update".into()));
    }
    if payload.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::InvalidInput("name must not be empty".into()));
    }
    let resp = client.put("users/profile", payload, Auth::Required).await?;
    require_data(resp)
}
