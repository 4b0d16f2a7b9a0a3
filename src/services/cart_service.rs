use crate::{
    client::{ApiClient, Auth, require_data},
    dto::cart::{AddToCartRequest, CheckoutRequest, CheckoutResponse},
    error::{AppError, AppResult},
    models::{Cart, CartItem},
};

/// The total is whatever the server computed; items are not re-summed.
pub async fn list_cart(client: &ApiClient) -> AppResult<Cart> {
    let resp = client.get("users/cart", Auth::Required).await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn add_to_cart(client: &ApiClient, payload: &AddToCartRequest) -> AppResult<CartItem> {
    if payload.start_time.is_empty() || payload.end_time.is_empty() {
        return Err(AppError::InvalidInput("a time slot must be selected".into()));
    }
    let resp = client.post("users/cart", payload, Auth::Required).await?;
    let item: CartItem = require_data(resp)?;
    tracing::info!(cart_item_id = item.cart_item_id, "cart line staged");
    Ok(item)
}

pub async fn remove_from_cart(client: &ApiClient, cart_item_id: i64) -> AppResult<()> {
    client
        .delete::<serde_json::Value>(&format!("users/cart/{cart_item_id}"), Auth::Required)
        .await?;
    tracing::info!(cart_item_id, "cart line removed");
    Ok(())
}

pub async fn checkout(client: &ApiClient, payload: &CheckoutRequest) -> AppResult<CheckoutResponse> {
    let resp = client
        .post::<CheckoutResponse, _>("users/cart/checkout", payload, Auth::Required)
        .await?;
    let confirmed = resp.data.unwrap_or_default();
    tracing::info!(appointments = confirmed.appointment_ids.len(), "checkout confirmed");
    Ok(confirmed)
}
