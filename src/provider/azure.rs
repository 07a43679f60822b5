use parking_lot::RwLock;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use url::Url;

use super::claims::IdTokenClaims;
use super::{IdentityProvider, InteractivePrompt};
use crate::error::Error;
use crate::pkce::AuthorizationSecrets;
use crate::types::{AccessToken, Account};

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/common/";
const OIDC_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];
/// Cached access tokens closer than this to expiry are refreshed.
const EXPIRY_SKEW: Duration = Duration::minutes(5);
/// Used when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(1);

/// Azure AD (Microsoft Entra ID) application registration settings.
///
/// ```rust,ignore
/// let config = AzureAdConfig::new("client-id", "http://localhost:5173".parse()?)
///     .with_authority(AzureAdConfig::authority_for_tenant("contoso.onmicrosoft.com")?)
///     .with_scopes(vec!["api://pos-backend/access_as_user".into()]);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct AzureAdConfig {
    pub(crate) client_id: String,
    pub(crate) authority: Url,
    pub(crate) redirect_uri: Url,
    pub(crate) post_logout_redirect_uri: Option<Url>,
    pub(crate) scopes: Vec<String>,
}

impl AzureAdConfig {
    /// Multi-tenant (`common`) configuration with no API scopes.
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
        Self {
            client_id: client_id.into(),
            authority: DEFAULT_AUTHORITY.parse().expect("valid default URL"),
            redirect_uri,
            post_logout_redirect_uri: None,
            scopes: Vec::new(),
        }
    }

    /// `https://login.microsoftonline.com/{tenant}/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the tenant does not form a valid URL.
    pub fn authority_for_tenant(tenant: &str) -> Result<Url, Error> {
        format!("https://login.microsoftonline.com/{}/", tenant.trim_matches('/'))
            .parse()
            .map_err(|e| Error::Config(format!("tenant {tenant:?}: {e}")))
    }

    /// Override the authority (tenant URL, B2C policy URL, or a test server).
    #[must_use]
    pub fn with_authority(mut self, mut authority: Url) -> Self {
        // `Url::join` drops the last segment unless the path ends in '/'.
        if !authority.path().ends_with('/') {
            let path = format!("{}/", authority.path());
            authority.set_path(&path);
        }
        self.authority = authority;
        self
    }

    #[must_use]
    pub fn with_post_logout_redirect_uri(mut self, uri: Url) -> Self {
        self.post_logout_redirect_uri = Some(uri);
        self
    }

    /// API scopes requested on top of `openid profile offline_access`.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Application (client) ID registered in Azure AD.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Tenant authority, e.g. `https://login.microsoftonline.com/{tenant}/`.
    #[must_use]
    pub fn authority(&self) -> &Url {
        &self.authority
    }

    /// Where the authorization code is delivered.
    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Page shown after sign-out, if any.
    #[must_use]
    pub fn post_logout_redirect_uri(&self) -> Option<&Url> {
        self.post_logout_redirect_uri.as_ref()
    }

    /// API scopes, without the OIDC ones.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.authority
            .join(path)
            .map_err(|e| Error::Config(format!("authority endpoint {path}: {e}")))
    }

    fn scope_param(&self) -> String {
        let mut scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        for scope in OIDC_SCOPES {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        scopes.join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

struct CachedAccount {
    account: Account,
    access_token: AccessToken,
    expires_at: OffsetDateTime,
    refresh_token: Option<String>,
}

impl CachedAccount {
    fn is_fresh(&self) -> bool {
        self.expires_at - EXPIRY_SKEW > OffsetDateTime::now_utc()
    }
}

/// [`IdentityProvider`] backed by Azure AD's v2.0 endpoints.
///
/// Tokens are cached in memory for the lifetime of the provider, matching a
/// browser tab's session-scoped token cache.
pub struct AzureAdProvider<P> {
    config: AzureAdConfig,
    http: reqwest::Client,
    prompt: P,
    cache: RwLock<Vec<CachedAccount>>,
}

impl<P: InteractivePrompt> AzureAdProvider<P> {
    #[must_use]
    pub fn new(config: AzureAdConfig, prompt: P) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            prompt,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Use a custom HTTP client (proxy settings, connection reuse, tests).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &AzureAdConfig {
        &self.config
    }

    fn authorization_url(&self, secrets: &AuthorizationSecrets) -> Result<Url, Error> {
        let mut url = self.config.endpoint("oauth2/v2.0/authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", self.config.client_id.as_str())
            .append_pair("response_type", "code")
            .append_pair("response_mode", "query")
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &self.config.scope_param())
            .append_pair("state", &secrets.state)
            .append_pair("nonce", &secrets.nonce)
            .append_pair("code_challenge", &secrets.code_challenge())
            .append_pair("code_challenge_method", "S256")
            .append_pair("prompt", "select_account");
        Ok(url)
    }

    fn logout_url(&self) -> Result<Url, Error> {
        let mut url = self.config.endpoint("oauth2/v2.0/logout")?;
        if let Some(uri) = &self.config.post_logout_redirect_uri {
            url.query_pairs_mut()
                .append_pair("post_logout_redirect_uri", uri.as_str());
        }
        Ok(url)
    }

    /// Pull the authorization code out of the redirect, checking `state`.
    fn read_callback(redirect: &Url, expected_state: &str) -> Result<String, Error> {
        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut error_description = None;
        for (key, value) in redirect.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            let detail = error_description.unwrap_or_default();
            tracing::warn!(error = %error, "authorization rejected by identity provider");
            return Err(match error.as_str() {
                "access_denied" | "user_cancelled" => Error::Cancelled {
                    code: error,
                    detail,
                },
                _ => Error::OAuth {
                    operation: "authorization",
                    status: None,
                    detail: format!("{error}: {detail}"),
                },
            });
        }

        if state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }

        code.ok_or_else(|| Error::OAuth {
            operation: "authorization",
            status: None,
            detail: "redirect carried no code".into(),
        })
    }

    async fn redeem(
        &self,
        params: &[(&str, &str)],
        operation: &'static str,
    ) -> Result<TokenResponse, Error> {
        let response = self
            .http
            .post(self.config.endpoint("oauth2/v2.0/token")?)
            .form(params)
            .send()
            .await?;

        let response = Self::ensure_success(response, operation).await?;
        response.json::<TokenResponse>().await.map_err(Into::into)
    }

    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(Error::OAuth {
            operation,
            status: Some(status),
            detail,
        })
    }

    fn remember(&self, account: Account, tokens: TokenResponse) {
        let entry = CachedAccount {
            expires_at: expiry(tokens.expires_in),
            access_token: AccessToken::new(tokens.access_token),
            refresh_token: tokens.refresh_token,
            account,
        };
        let mut cache = self.cache.write();
        cache.retain(|c| c.account.home_account_id != entry.account.home_account_id);
        cache.push(entry);
    }
}

fn expiry(expires_in: Option<i64>) -> OffsetDateTime {
    let lifetime = expires_in
        .filter(|secs| *secs > 0)
        .map_or(DEFAULT_TOKEN_LIFETIME, Duration::seconds);
    OffsetDateTime::now_utc() + lifetime
}

impl<P: InteractivePrompt> IdentityProvider for AzureAdProvider<P> {
    async fn login(&self) -> Result<Account, Error> {
        let secrets = AuthorizationSecrets::generate();
        let authorize_url = self.authorization_url(&secrets)?;

        tracing::debug!("opening interactive login");
        let redirect = self.prompt.authorize(authorize_url).await?;
        let code = Self::read_callback(&redirect, &secrets.state)?;

        let scope = self.config.scope_param();
        let tokens = self
            .redeem(
                &[
                    ("grant_type", "authorization_code"),
                    ("client_id", self.config.client_id.as_str()),
                    ("code", code.as_str()),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                    ("code_verifier", secrets.code_verifier.as_str()),
                    ("scope", scope.as_str()),
                ],
                "token exchange",
            )
            .await?;

        let id_token = tokens
            .id_token
            .as_deref()
            .ok_or_else(|| Error::Token("token response carried no id_token".into()))?;
        let claims = IdTokenClaims::decode(id_token)?;
        if claims.nonce.as_deref() != Some(secrets.nonce.as_str()) {
            return Err(Error::Token("id_token nonce mismatch".into()));
        }
        let account = claims.into_account()?;

        self.remember(account.clone(), tokens);
        tracing::info!("interactive login completed");
        Ok(account)
    }

    async fn acquire_token_silent(&self, account: &Account) -> Result<AccessToken, Error> {
        let (refresh_token, cached_account) = {
            let cache = self.cache.read();
            let entry = cache
                .iter()
                .find(|c| c.account.home_account_id == account.home_account_id)
                .ok_or_else(|| Error::UnknownAccount(account.home_account_id.to_string()))?;
            if entry.is_fresh() {
                return Ok(entry.access_token.clone());
            }
            (entry.refresh_token.clone(), entry.account.clone())
        };

        let refresh_token = refresh_token.ok_or(Error::InteractionRequired)?;
        tracing::debug!("cached access token stale, redeeming refresh token");

        let scope = self.config.scope_param();
        let mut tokens = self
            .redeem(
                &[
                    ("grant_type", "refresh_token"),
                    ("client_id", self.config.client_id.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("scope", scope.as_str()),
                ],
                "token refresh",
            )
            .await
            .map_err(|e| match e {
                Error::OAuth { ref detail, .. } if detail.contains("invalid_grant") => {
                    Error::InteractionRequired
                }
                other => other,
            })?;

        // Refresh tokens rotate only sometimes; keep the old one otherwise.
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }
        let token = AccessToken::new(tokens.access_token.clone());
        self.remember(cached_account, tokens);
        Ok(token)
    }

    async fn logout(&self) -> Result<(), Error> {
        let logout_url = self.logout_url()?;
        self.cache.write().clear();
        self.prompt.end_session(logout_url).await
    }

    fn accounts(&self) -> Vec<Account> {
        self.cache.read().iter().map(|c| c.account.clone()).collect()
    }
}
