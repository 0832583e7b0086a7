//! Identity provider abstraction.
//!
//! The order operations never talk to the auth backend directly. They go
//! through [`UserDirectory`], which verifies bearer tokens and resolves
//! uids to user records. [`MemoryUserDirectory`] backs tests and local
//! runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use common::UserId;
use domain::UserProfile;

use crate::auth::AuthContext;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("unknown token")]
    InvalidToken,
    #[error("no user record for {0}")]
    UserNotFound(UserId),
    #[error("directory backend error: {0}")]
    Backend(String),
}

/// Verifies caller tokens and looks up user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves a bearer token to the caller it identifies.
    async fn authenticate(&self, token: &str) -> Result<AuthContext, DirectoryError>;

    /// Fetches the user record behind a uid.
    async fn get_user(&self, uid: &UserId) -> Result<UserProfile, DirectoryError>;
}

/// In-memory directory for tests and local runs.
///
/// Tokens are issued by [`register`](MemoryUserDirectory::register) and are
/// deliberately predictable (`token-<uid>`) so tests can construct them.
#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    inner: Arc<RwLock<DirectoryState>>,
}

#[derive(Default)]
struct DirectoryState {
    tokens: HashMap<String, AuthContext>,
    profiles: HashMap<UserId, UserProfile>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with a profile and returns their bearer token.
    pub async fn register(&self, uid: impl Into<UserId>, profile: UserProfile) -> String {
        self.insert(AuthContext::new(uid), profile).await
    }

    /// Registers a user carrying the admin flag.
    pub async fn register_admin(&self, uid: impl Into<UserId>, profile: UserProfile) -> String {
        self.insert(AuthContext::admin(uid), profile).await
    }

    async fn insert(&self, context: AuthContext, profile: UserProfile) -> String {
        let token = format!("token-{}", context.uid);
        let mut state = self.inner.write().await;
        state.profiles.insert(context.uid.clone(), profile);
        state.tokens.insert(token.clone(), context);
        token
    }

    /// Drops a user record while leaving their token valid. Lets tests
    /// exercise the lookup-failure paths.
    pub async fn remove_user(&self, uid: &UserId) {
        self.inner.write().await.profiles.remove(uid);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn authenticate(&self, token: &str) -> Result<AuthContext, DirectoryError> {
        self.inner
            .read()
            .await
            .tokens
            .get(token)
            .cloned()
            .ok_or(DirectoryError::InvalidToken)
    }

    async fn get_user(&self, uid: &UserId) -> Result<UserProfile, DirectoryError> {
        self.inner
            .read()
            .await
            .profiles
            .get(uid)
            .cloned()
            .ok_or_else(|| DirectoryError::UserNotFound(uid.clone()))
    }
}
