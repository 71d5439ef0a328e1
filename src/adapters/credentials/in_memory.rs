//! In-memory credential store, for tests and embedding.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::sync::{PoisonError, RwLock};

use crate::ports::CredentialStore;

/// Credential store holding the token in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: RwLock<Option<Secret<String>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(Secret::new(token.into()))),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(Secret::new(token.into()));
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn token(&self) -> Option<Secret<String>> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| Secret::new(t.expose_secret().clone()))
    }
}
