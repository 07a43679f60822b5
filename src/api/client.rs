use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::config::ApiConfig;
use crate::navigation::{LOGIN_PATH, Navigation, Navigator};
use crate::session::store::{self, SessionStore};

/// Backend REST client.
///
/// Reads the bearer token from the session store on every request and
/// applies the central status policy:
///
/// | status | action |
/// |---|---|
/// | 401 | clear the session record, full page load of `/login` |
/// | 403 | log, return [`ApiError::Forbidden`] |
/// | 500 | log, return [`ApiError::Server`] |
///
/// A 401 never touches the session manager's in-memory state; the page
/// load that follows resets it.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            store,
            navigator,
        })
    }

    /// Use a custom HTTP client. Default headers and timeout then come from it.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/{path}` decoded as `T`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        decode(response).await
    }

    /// Body-less `PATCH`, used for state toggles.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::PATCH, path)).await?;
        decode(response).await
    }

    /// `DELETE`; any response body is ignored.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match store::bearer_token(self.store.as_ref()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(self.intercept(status, detail))
    }

    fn intercept(&self, status: StatusCode, detail: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::info!("backend rejected credentials, forcing sign-in");
                store::clear_record(self.store.as_ref());
                self.navigator.navigate(Navigation::Load(LOGIN_PATH.to_owned()));
                ApiError::Unauthorized
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!("permission denied for this action");
                ApiError::Forbidden { detail }
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("server error, try again later");
                ApiError::Server { detail }
            }
            other => ApiError::Status {
                status: other.as_u16(),
                detail,
            },
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
