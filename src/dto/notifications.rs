use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceTokenRequest {
    pub token: String,
    pub platform: String,
}
