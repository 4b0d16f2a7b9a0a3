use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{AppError, AppResult},
    response::ApiResponse,
    session::AuthContext,
    storage::Preferences,
};

/// How a request is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Fails with [`AppError::MissingToken`] before any network traffic.
    Required,
    /// Attaches the bearer token when one is stored.
    Optional,
    None,
}

/// Thin wrapper over one HTTP connection pool pointed at the booking backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthContext,
    preferences: Preferences,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        auth: AuthContext,
        preferences: Preferences,
    ) -> AppResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            preferences,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
    ) -> AppResult<ApiResponse<T>> {
        self.send(Method::GET, path, auth, |req| req).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q, auth: Auth) -> AppResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, auth, |req| req.query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, auth: Auth) -> AppResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, auth, |req| req.json(body))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, auth: Auth) -> AppResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, auth, |req| req.json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
    ) -> AppResult<ApiResponse<T>> {
        self.send(Method::DELETE, path, auth, |req| req).await
    }

    async fn send<T, F>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        build: F,
    ) -> AppResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let token = match auth {
            Auth::Required => Some(self.auth.require_token()?),
            Auth::Optional => self.auth.token()?,
            Auth::None => None,
        };
        let language = self.preferences.language()?;

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(header::ACCEPT_LANGUAGE, language.code());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(method = %method, path = %path, "api request");
        let response = build(request).send().await.map_err(|err| {
            tracing::warn!(method = %method, path = %path, error = %err, "api request failed");
            AppError::Network(err)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = AppError::from_response(status, &body);
            tracing::warn!(
                method = %method,
                path = %path,
                status = %status,
                code = ?err.code(),
                message = %err,
                "api request rejected"
            );
            if status == StatusCode::UNAUTHORIZED && auth == Auth::Required {
                self.auth.sign_out()?;
            }
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse {
                message: None,
                data: None,
                meta: None,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Unwraps the `data` member of a successful envelope.
pub fn require_data<T>(response: ApiResponse<T>) -> AppResult<T> {
    response
        .data
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("response envelope had no data")))
}
