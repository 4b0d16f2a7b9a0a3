mod common;

use common::{TOKEN, bearer, setup_signed_in_app, setup_test_app, stored_token};
use salon_booking_client::{
    dto::auth::{LoginRequest, VerifyOtpRequest},
    error::AppError,
    services::{auth_service, cart_service, profile_service},
    storage::StorageKey,
};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// Integration flow: login sends OTP -> verify persists token -> authenticated call carries it.
#[tokio::test]
async fn otp_login_starts_session_and_authorizes_calls() -> anyhow::Result<()> {
    let app = setup_test_app().await?;
    app.store.set(StorageKey::PushToken, "push-123")?;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "phone": "+962790000000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "OTP sent",
            "data": { "phone": "+962790000000", "expires_in": 120 }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_json(json!({
            "phone": "+962790000000",
            "otp": "1234",
            "fcm_token": "push-123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "token": format!("Bearer {TOKEN}"),
                "user": { "id": 1, "name": "Rana", "phone": "+962790000000" }
            }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", bearer().as_str()))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 1, "name": "Rana", "phone": "+962790000000", "email": null }
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let client = &app.state.client;
    let challenge = auth_service::login(
        client,
        &LoginRequest {
            phone: "+962790000000".into(),
        },
    )
    .await?;
    assert_eq!(challenge.expires_in, Some(120));
    assert!(!client.auth().is_authenticated());

    let user = auth_service::verify_otp(
        client,
        VerifyOtpRequest {
            phone: "+962790000000".into(),
            otp: "1234".into(),
            fcm_token: None,
        },
    )
    .await?;
    assert_eq!(user.map(|u| u.name), Some("Rana".to_string()));
    assert!(client.auth().is_authenticated());
    assert_eq!(stored_token(&app).as_deref(), Some(TOKEN));

    let profile = profile_service::get_profile(client).await?;
    assert_eq!(profile.phone, "+962790000000");

    Ok(())
}

#[tokio::test]
async fn wrong_otp_surfaces_server_message() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The OTP is invalid",
            "errors": { "otp": ["The OTP is invalid"] }
        })))
        .mount(&app.server)
        .await;

    let err = auth_service::verify_otp(
        &app.state.client,
        VerifyOtpRequest {
            phone: "+962790000000".into(),
            otp: "0000".into(),
            fcm_token: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "The OTP is invalid");
    assert!(!app.state.client.auth().is_authenticated());
    assert_eq!(stored_token(&app), None);
    Ok(())
}

#[tokio::test]
async fn missing_token_fails_before_any_request() -> anyhow::Result<()> {
    let app = setup_test_app().await?;

    let err = cart_service::list_cart(&app.state.client).await.unwrap_err();
    assert!(matches!(err, AppError::MissingToken));

    let received = app.server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_clears_session() -> anyhow::Result<()> {
    let app = setup_signed_in_app().await?;

    Mock::given(method("GET"))
        .and(path("/users/cart"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })),
        )
        .mount(&app.server)
        .await;

    let err = cart_service::list_cart(&app.state.client).await.unwrap_err();
    assert_eq!(err.user_message(), "Unauthenticated.");
    assert!(!app.state.client.auth().is_authenticated());
    assert_eq!(stored_token(&app), None);
    Ok(())
}

#[tokio::test]
async fn logout_clears_local_session_even_if_server_fails() -> anyhow::Result<()> {
    let app = setup_signed_in_app().await?;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;

    auth_service::logout(&app.state.client).await?;
    assert!(!app.state.client.auth().is_authenticated());
    assert_eq!(stored_token(&app), None);
    Ok(())
}

#[tokio::test]
async fn delete_account_destroys_session() -> anyhow::Result<()> {
    let app = setup_signed_in_app().await?;

    Mock::given(method("DELETE"))
        .and(path("/users/account"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&app.server)
        .await;

    auth_service::delete_account(&app.state.client).await?;
    assert_eq!(stored_token(&app), None);
    Ok(())
}
