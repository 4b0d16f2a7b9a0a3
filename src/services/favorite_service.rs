use crate::{
    client::{ApiClient, Auth, require_data},
    dto::{favorites::AddFavoriteRequest, params::Pagination},
    error::AppResult,
    models::Favorite,
    response::Paginated,
};

pub async fn list_favorites(
    client: &ApiClient,
    pagination: Pagination,
) -> AppResult<Paginated<Favorite>> {
    let resp = client
        .get_query::<Vec<Favorite>, _>("users/favorites", &pagination.normalize(), Auth::Required)
        .await?;
    Ok(resp.into_page())
}

pub async fn add_favorite(client: &ApiClient, salon_id: i64) -> AppResult<Favorite> {
    let resp = client
        .post("users/favorites", &AddFavoriteRequest { salon_id }, Auth::Required)
        .await?;
    require_data(resp)
}

pub async fn remove_favorite(client: &ApiClient, salon_id: i64) -> AppResult<()> {
    client
        .delete::<serde_json::Value>(&format!("users/favorites/{salon_id}"), Auth::Required)
        .await?;
    Ok(())
}
