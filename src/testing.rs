//! Scriptable identity provider shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::Error;
use crate::provider::IdentityProvider;
use crate::types::{AccessToken, Account};

#[derive(Clone)]
pub(crate) enum LoginScript {
    Succeed(Account),
    Cancel,
    TokenFails(Account),
}

pub(crate) struct FakeProvider {
    pub(crate) accounts: Mutex<Vec<Account>>,
    pub(crate) script: Mutex<LoginScript>,
    /// When set, `login()` parks until notified.
    pub(crate) gate: Option<Arc<Notify>>,
    pub(crate) login_calls: AtomicUsize,
    pub(crate) logout_calls: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn new(script: LoginScript) -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            script: Mutex::new(script),
            gate: None,
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_accounts(self, accounts: Vec<Account>) -> Self {
        *self.accounts.lock() = accounts;
        self
    }

    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn logouts(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn ana() -> Account {
    Account::new("ana-oid.tenant", "ana@contoso.com").with_name("Ana")
}

impl IdentityProvider for FakeProvider {
    async fn login(&self) -> Result<Account, Error> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let script = self.script.lock().clone();
        match script {
            LoginScript::Succeed(account) | LoginScript::TokenFails(account) => {
                self.accounts.lock().push(account.clone());
                Ok(account)
            }
            LoginScript::Cancel => Err(Error::Cancelled {
                code: "user_cancelled".into(),
                detail: "popup closed".into(),
            }),
        }
    }

    async fn acquire_token_silent(&self, account: &Account) -> Result<AccessToken, Error> {
        let script = self.script.lock().clone();
        match script {
            LoginScript::TokenFails(_) => Err(Error::InteractionRequired),
            _ => Ok(AccessToken::new(format!("token-for-{}", account.username))),
        }
    }

    async fn logout(&self) -> Result<(), Error> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts.lock().clear();
        Ok(())
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().clone()
    }
}
