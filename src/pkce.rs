use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Per-request secrets for one authorization-code round trip.
///
/// `state` and `nonce` are echoed back by the provider and must match;
/// `code_verifier` is only ever sent to the token endpoint.
#[derive(Clone)]
pub struct AuthorizationSecrets {
    pub state: String,
    pub nonce: String,
    pub code_verifier: String,
}

impl AuthorizationSecrets {
    #[must_use]
    pub fn generate() -> Self {
        Self {
            state: random_token::<16>(),
            nonce: random_token::<16>(),
            code_verifier: random_token::<48>(),
        }
    }

    /// S256 challenge for this request's verifier.
    #[must_use]
    pub fn code_challenge(&self) -> String {
        code_challenge(&self.code_verifier)
    }
}

/// `BASE64URL(SHA256(verifier))`, per RFC 7636.
#[must_use]
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn random_token<const N: usize>() -> String {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}
