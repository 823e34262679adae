//! In-memory identity provider mirroring the hosted provider's rules.
//! Used by tests and the standalone dev backend.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AuthError, IdentityProvider};

struct Account {
    id: String,
    password: String,
}

#[derive(Default)]
pub struct MemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.id.clone()),
            // Unknown account and wrong password are indistinguishable.
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_up(&self, email: &str, password: &str, _name: &str) -> Result<String, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        // Hosted provider's minimum password length.
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        let id = Uuid::new_v4().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        Ok(id)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let accounts = self.accounts.read().await;
        if accounts.contains_key(email) {
            Ok(())
        } else {
            Err(AuthError::UserNotFound)
        }
    }

    async fn resolve_owner(&self, email: &str) -> Result<String, AuthError> {
        let accounts = self.accounts.read().await;
        accounts
            .get(email)
            .map(|a| a.id.clone())
            .ok_or(AuthError::UserNotFound)
    }
}
