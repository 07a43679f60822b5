//! Identity-provider capability surface.
//!
//! The session manager only ever talks to an [`IdentityProvider`]. The
//! bundled [`AzureAdProvider`] implements it with the authorization-code +
//! PKCE flow against Microsoft Entra ID (Azure AD), delegating the popup
//! itself to an [`InteractivePrompt`].

#[cfg(feature = "azure")]
mod azure;
#[cfg(feature = "azure")]
mod claims;

use std::future::Future;

#[cfg(feature = "azure")]
pub use azure::{AzureAdConfig, AzureAdProvider};
use url::Url;

use crate::error::Error;
use crate::types::{AccessToken, Account};

/// Login / token / logout capability of a third-party identity provider.
///
/// Every call resolves exactly once, either with a value or an [`Error`].
pub trait IdentityProvider: Send + Sync + 'static {
    /// Run the interactive (popup) login and return the signed-in account.
    fn login(&self) -> impl Future<Output = Result<Account, Error>> + Send;

    /// Obtain an access token for `account` without user interaction.
    fn acquire_token_silent(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<AccessToken, Error>> + Send;

    /// Sign out at the provider. May navigate away on its own.
    fn logout(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Accounts the provider currently considers signed in.
    fn accounts(&self) -> Vec<Account>;
}

/// The user-agent half of an interactive flow (a popup window, a system
/// browser, a webview).
pub trait InteractivePrompt: Send + Sync + 'static {
    /// Show `authorize_url` and resolve with the URL the provider redirected
    /// back to (carrying `code`/`state` or `error`).
    fn authorize(&self, authorize_url: Url) -> impl Future<Output = Result<Url, Error>> + Send;

    /// Show the provider's end-session page.
    fn end_session(&self, logout_url: Url) -> impl Future<Output = Result<(), Error>> + Send;
}
