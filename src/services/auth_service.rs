use crate::{
    client::{ApiClient, Auth, require_data},
    dto::auth::{LoginRequest, LoginResponse, OtpChallenge, RegisterRequest, ResendOtpRequest, VerifyOtpRequest},
    error::AppResult,
    models::Profile,
};

pub async fn register(client: &ApiClient, payload: &RegisterRequest) -> AppResult<OtpChallenge> {
    let resp = client.post("auth/register", payload, Auth::None).await?;
    Ok(resp.data.unwrap_or(OtpChallenge {
        phone: Some(payload.phone.clone()),
        expires_in: None,
    }))
}

pub async fn login(client: &ApiClient, payload: &LoginRequest) -> AppResult<OtpChallenge> {
    let resp = client.post("auth/login", payload, Auth::None).await?;
    Ok(resp.data.unwrap_or(OtpChallenge {
        phone: Some(payload.phone.clone()),
        expires_in: None,
    }))
}

pub async fn resend_otp(client: &ApiClient, payload: &ResendOtpRequest) -> AppResult<OtpChallenge> {
    let resp = client.post("auth/resend-otp", payload, Auth::None).await?;
    Ok(resp.data.unwrap_or(OtpChallenge {
        phone: Some(payload.phone.clone()),
        expires_in: None,
    }))
}

/// Completes phone authentication and starts the local session. The stored
/// push token rides along so the backend can address this device.
pub async fn verify_otp(
    client: &ApiClient,
    mut payload: VerifyOtpRequest,
) -> AppResult<Option<Profile>> {
    if payload.fcm_token.is_none() {
        payload.fcm_token = client.preferences().push_token()?;
    }

    let resp = client
        .post::<LoginResponse, _>("auth/verify-otp", &payload, Auth::None)
        .await?;
    let LoginResponse { token, user } = require_data(resp)?;
    client.auth().sign_in(&token)?;

    Ok(user)
}

/// Ends the session locally even when the server call fails.
pub async fn logout(client: &ApiClient) -> AppResult<()> {
    if client.auth().token()?.is_some() {
        if let Err(err) = client
            .post::<serde_json::Value, _>("auth/logout", &serde_json::json!({}), Auth::Required)
            .await
        {
            tracing::warn!(error = %err, "server logout failed");
        }
    }
    client.auth().sign_out()
}

pub async fn delete_account(client: &ApiClient) -> AppResult<()> {
    client
        .delete::<serde_json::Value>("users/account", Auth::Required)
        .await?;
    client.auth().sign_out()?;
    tracing::info!("account deleted");
    Ok(())
}
