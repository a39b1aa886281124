use crate::api::{ApiError, BookingApi, Credentials};
use crate::storage::TokenStore;

/// The admin's authenticated state. Owned by whoever issues admin requests and
/// consulted before each of them.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    store: Option<TokenStore>,
}

impl Session {
    /// A session that lives only in memory.
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// An in-memory session that is already signed in.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            store: None,
        }
    }

    /// Picks up the token a previous run left behind, if any.
    pub fn restore(store: TokenStore) -> Self {
        let token = store.load();
        if token.is_some() {
            log::info!("restored session from {}", store.path().display());
        }
        Self {
            token,
            store: Some(store),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotAuthenticated)
    }

    pub async fn login<A>(&mut self, api: &A, username: &str, password: &str) -> Result<(), ApiError>
    where
        A: BookingApi + ?Sized,
    {
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter both username and password.".into(),
            ));
        }

        self.token = None;
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token = api.login(&credentials).await?;

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&token) {
                log::warn!("failed to persist session: {}", e);
            }
        }
        self.token = Some(token);
        log::info!("logged in as {}", username);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                log::warn!("failed to clear persisted session: {}", e);
            }
        }
        log::info!("logged out");
    }
}
