use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AddFavoriteRequest {
    pub salon_id: i64,
}
