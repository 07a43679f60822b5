use std::time::Duration;

#[cfg(feature = "azure")]
use url::Url;

use crate::error::Error;
#[cfg(feature = "azure")]
use crate::provider::AzureAdConfig;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend REST settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Backend API root, e.g. `http://localhost:5000/api`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Everything the console needs to start.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct AppConfig {
    pub api: ApiConfig,
    #[cfg(feature = "azure")]
    pub azure: AzureAdConfig,
}

impl AppConfig {
    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `AZURE_AD_CLIENT_ID`: application (client) ID
    /// - `AZURE_AD_REDIRECT_URI`: redirect URI registered for the app
    ///
    /// # Optional env vars
    /// - `AZURE_AD_TENANT_ID`: tenant ID or domain (default `common`)
    /// - `AZURE_AD_POST_LOGOUT_REDIRECT_URI`: where to land after logout
    ///   (default: origin of the redirect URI)
    /// - `AZURE_AD_SCOPES`: comma-separated API scopes
    /// - `POS_API_URL`: backend base URL (default `http://localhost:5000/api`)
    /// - `POS_API_TIMEOUT_SECS`: request timeout (default 30)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut api = ApiConfig::new(
            lookup("POS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
        );
        if let Some(secs) = lookup("POS_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("POS_API_TIMEOUT_SECS: {e}")))?;
            api = api.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            api,
            #[cfg(feature = "azure")]
            azure: azure_from_lookup(&lookup)?,
        })
    }
}

#[cfg(feature = "azure")]
fn azure_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<AzureAdConfig, Error> {
    let client_id = lookup("AZURE_AD_CLIENT_ID")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config("AZURE_AD_CLIENT_ID is required".into()))?;
    let redirect_uri: Url = lookup("AZURE_AD_REDIRECT_URI")
        .ok_or_else(|| Error::Config("AZURE_AD_REDIRECT_URI is required".into()))?
        .parse()
        .map_err(|e| Error::Config(format!("AZURE_AD_REDIRECT_URI: {e}")))?;

    let post_logout: Url = match lookup("AZURE_AD_POST_LOGOUT_REDIRECT_URI") {
        Some(uri) => uri
            .parse()
            .map_err(|e| Error::Config(format!("AZURE_AD_POST_LOGOUT_REDIRECT_URI: {e}")))?,
        None => redirect_uri
            .join("/")
            .map_err(|e| Error::Config(format!("AZURE_AD_REDIRECT_URI: {e}")))?,
    };

    let mut config = AzureAdConfig::new(client_id, redirect_uri)
        .with_post_logout_redirect_uri(post_logout);

    if let Some(tenant) = lookup("AZURE_AD_TENANT_ID").filter(|t| !t.trim().is_empty()) {
        config = config.with_authority(AzureAdConfig::authority_for_tenant(tenant.trim())?);
    }
    if let Some(scopes) = lookup("AZURE_AD_SCOPES") {
        config = config.with_scopes(
            scopes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }
    Ok(config)
}
