use serde::{Deserialize, Serialize};

use crate::models::Profile;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendOtpRequest {
    pub phone: String,
}

/// Returned by register/login/resend: an OTP was sent to `phone`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OtpChallenge {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Profile>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
