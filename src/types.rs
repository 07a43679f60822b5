use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Placeholder shown when the identity provider returns no display name.
pub const DEFAULT_DISPLAY_NAME: &str = "Usuario";

/// Identity-provider account identifier (`{oid}.{tid}` for Azure AD).
///
/// Opaque to the console; only compared and persisted.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct AccountId(pub String);

/// Branch (sucursal) identifier assigned by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, FromStr, From, Into,
)]
#[serde(transparent)]
pub struct LocalId(pub i64);

/// Signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Account {
    pub home_account_id: AccountId,
    /// Login identifier, usually the user's email.
    pub username: String,
    pub name: Option<String>,
}

impl Account {
    #[must_use]
    pub fn new(home_account_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            home_account_id: AccountId(home_account_id.into()),
            username: username.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The authenticated end user for the lifetime of a tab.
///
/// Serialized into the session store under the `user` key, so the field
/// names follow the stored JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub email: String,
    #[serde(rename = "azureId")]
    pub account_id: AccountId,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Self {
            name: account
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: account.username.clone(),
            account_id: account.home_account_id.clone(),
        }
    }
}

/// Bearer token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, From, Into)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the token itself.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}
