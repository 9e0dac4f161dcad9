//! Admin credential verification and session-scoped auth state.
//!
//! The core carries no secret material: credentials live behind the
//! [`CredentialVerifier`] trait and the admin flag lives in the
//! visitor's cookie session, not in process-wide state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::api::ApiError;
use crate::StoreError;

/// Session keys.
pub mod keys {
    /// Marker for a logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
    /// Stable per-visitor id used to key the cart store.
    pub const VISITOR_ID: &str = "visitor_id";
}

/// Pluggable credential check.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single-admin credential pair, loaded from the environment.
pub struct EnvCredentials {
    username: String,
    password: SecretString,
}

impl EnvCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl CredentialVerifier for EnvCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.expose_secret()
    }
}

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: String,
}

/// Extractor rejecting with 401 unless the session carries the admin
/// flag.
pub struct RequireAdmin(pub CurrentAdmin);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is placed in extensions by SessionManagerLayer.
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StoreError::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(StoreError::Unauthorized)?;

        Ok(Self(admin))
    }
}

/// Get or create the stable visitor id for this session.
pub async fn visitor_id(session: &Session) -> Result<Uuid, StoreError> {
    if let Some(id) = session
        .get::<Uuid>(keys::VISITOR_ID)
        .await
        .map_err(session_error)?
    {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session
        .insert(keys::VISITOR_ID, id)
        .await
        .map_err(session_error)?;
    Ok(id)
}

pub(crate) fn session_error(err: tower_sessions::session::Error) -> StoreError {
    StoreError::Internal(err.to_string())
}
