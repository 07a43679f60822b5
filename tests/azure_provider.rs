#![cfg(feature = "azure")]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use pos_console::session::store::{ACCESS_TOKEN_KEY, USER_KEY};
use pos_console::{
    AzureAdConfig, AzureAdProvider, Error, IdentityProvider, InteractivePrompt, MemorySessionStore,
    SessionError, SessionManager, SessionStore, pkce,
};
use serde_json::json;
use url::Url;

const REDIRECT_URI: &str = "http://localhost:5173/auth/callback";

#[derive(Default)]
struct MockTenant {
    /// Lifetime handed out with the authorization-code grant.
    expires_in: i64,
    reject_refresh: bool,
    nonce: Mutex<Option<String>>,
    challenge: Mutex<Option<String>>,
    grants: Mutex<Vec<HashMap<String, String>>>,
    ended_sessions: Mutex<Vec<Url>>,
}

fn id_token(nonce: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = json!({
        "oid": "ana-oid",
        "tid": "contoso-tid",
        "preferred_username": "ana@contoso.com",
        "name": "Ana Pérez",
        "nonce": nonce,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

async fn token(
    State(endpoint): State<Arc<MockTenant>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    endpoint.grants.lock().push(form.clone());

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") => {
            let verifier = form.get("code_verifier").cloned().unwrap_or_default();
            let expected = endpoint.challenge.lock().clone();
            if form.get("code").map(String::as_str) != Some("auth-code")
                || Some(pkce::code_challenge(&verifier)) != expected
            {
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" })))
                    .into_response();
            }
            let nonce = endpoint.nonce.lock().clone().unwrap_or_default();
            Json(json!({
                "token_type": "Bearer",
                "access_token": "at-1",
                "expires_in": endpoint.expires_in,
                "refresh_token": "rt-1",
                "id_token": id_token(&nonce),
            }))
            .into_response()
        }
        Some("refresh_token") if endpoint.reject_refresh => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "AADSTS700082: The refresh token has expired"
            })),
        )
            .into_response(),
        Some("refresh_token") => Json(json!({
            "token_type": "Bearer",
            "access_token": "at-2",
            "expires_in": 3600,
        }))
        .into_response(),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn serve(endpoint: Arc<MockTenant>) -> SocketAddr {
    let app = Router::new()
        .route("/contoso-tid/oauth2/v2.0/token", post(token))
        .with_state(endpoint);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Plays the user: approves the consent page and returns the redirect.
struct ApprovingPrompt {
    tenant: Arc<MockTenant>,
}

impl InteractivePrompt for ApprovingPrompt {
    async fn authorize(&self, authorize_url: Url) -> Result<Url, Error> {
        let params: HashMap<String, String> = authorize_url.query_pairs().into_owned().collect();
        *self.tenant.nonce.lock() = params.get("nonce").cloned();
        *self.tenant.challenge.lock() = params.get("code_challenge").cloned();

        let state = params.get("state").cloned().unwrap_or_default();
        Ok(Url::parse_with_params(
            REDIRECT_URI,
            &[("code", "auth-code"), ("state", state.as_str())],
        )
        .unwrap())
    }

    async fn end_session(&self, logout_url: Url) -> Result<(), Error> {
        self.tenant.ended_sessions.lock().push(logout_url);
        Ok(())
    }
}

async fn provider(endpoint: MockTenant) -> (AzureAdProvider<ApprovingPrompt>, Arc<MockTenant>) {
    let endpoint = Arc::new(endpoint);
    let addr = serve(endpoint.clone()).await;
    let config = AzureAdConfig::new("pos-client", REDIRECT_URI.parse().unwrap())
        .with_authority(format!("http://{addr}/contoso-tid").parse().unwrap())
        .with_post_logout_redirect_uri("http://localhost:5173/".parse().unwrap());
    let prompt = ApprovingPrompt {
        tenant: endpoint.clone(),
    };
    (AzureAdProvider::new(config, prompt), endpoint)
}

#[tokio::test]
async fn login_stores_identity_and_token() {
    let (provider, endpoint) = provider(MockTenant {
        expires_in: 3600,
        ..MockTenant::default()
    })
    .await;
    let store = Arc::new(MemorySessionStore::new());
    let session = SessionManager::new(provider, store.clone());
    session.resolve();

    let identity = session.login().await.unwrap();

    assert_eq!(identity.name, "Ana Pérez");
    assert_eq!(identity.email, "ana@contoso.com");
    assert_eq!(identity.account_id.to_string(), "ana-oid.contoso-tid");
    assert!(session.is_authenticated());
    assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("at-1"));
    let stored: serde_json::Value = serde_json::from_str(&store.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored["azureId"], "ana-oid.contoso-tid");

    // Fresh token: the silent request was served from cache.
    let grants = endpoint.grants.lock();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0]["client_id"], "pos-client");
    assert_eq!(grants[0]["redirect_uri"], REDIRECT_URI);
}

#[tokio::test]
async fn short_lived_token_is_refreshed_silently() {
    let (provider, endpoint) = provider(MockTenant {
        expires_in: 60,
        ..MockTenant::default()
    })
    .await;

    let account = provider.login().await.unwrap();
    let token = provider.acquire_token_silent(&account).await.unwrap();

    assert_eq!(token.as_str(), "at-2");
    let grants = endpoint.grants.lock();
    assert_eq!(grants.len(), 2);
    assert_eq!(grants[1]["grant_type"], "refresh_token");
    assert_eq!(grants[1]["refresh_token"], "rt-1");
}

#[tokio::test]
async fn expired_refresh_token_requires_interaction() {
    let (provider, _) = provider(MockTenant {
        expires_in: 60,
        reject_refresh: true,
        ..MockTenant::default()
    })
    .await;
    let store = Arc::new(MemorySessionStore::new());
    let session = SessionManager::new(provider, store.clone());
    session.resolve();

    let err = session.login().await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Provider(Error::InteractionRequired)
    ));
    assert!(!session.is_authenticated());
    assert!(store.get(USER_KEY).is_none());
    assert!(store.get(ACCESS_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn logout_clears_cache_and_ends_provider_session() {
    let (provider, tenant) = provider(MockTenant {
        expires_in: 3600,
        ..MockTenant::default()
    })
    .await;
    let store = Arc::new(MemorySessionStore::new());
    let session = SessionManager::new(provider, store.clone());
    session.resolve();
    session.login().await.unwrap();

    session.logout().await;

    assert!(store.is_empty());
    assert!(session.provider().accounts().is_empty());
    let ended = tenant.ended_sessions.lock();
    assert_eq!(ended.len(), 1);
    assert!(ended[0].path().ends_with("/contoso-tid/oauth2/v2.0/logout"));
    assert_eq!(
        ended[0].query(),
        Some("post_logout_redirect_uri=http%3A%2F%2Flocalhost%3A5173%2F")
    );
}
