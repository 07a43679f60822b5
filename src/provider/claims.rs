use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::Error;
use crate::types::Account;

/// The subset of Azure AD id_token claims used to build an [`Account`].
///
/// The signature is not checked: the token came straight from the token
/// endpoint over TLS and is only used for display data, never for
/// authorization decisions.
#[derive(Debug, Deserialize)]
pub(super) struct IdTokenClaims {
    pub(super) oid: String,
    pub(super) tid: String,
    #[serde(default)]
    pub(super) preferred_username: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) nonce: Option<String>,
}

impl IdTokenClaims {
    pub(super) fn decode(id_token: &str) -> Result<Self, Error> {
        let mut parts = id_token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(Error::Token("id_token is not a compact JWT".into())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::Token(format!("id_token payload: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| Error::Token(format!("id_token claims: {e}")))
    }

    pub(super) fn into_account(self) -> Result<Account, Error> {
        let username = self
            .preferred_username
            .or(self.email)
            .ok_or_else(|| Error::Token("missing claim: preferred_username".into()))?;

        let account = Account::new(format!("{}.{}", self.oid, self.tid), username);
        Ok(match self.name {
            Some(name) => account.with_name(name),
            None => account,
        })
    }
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}
