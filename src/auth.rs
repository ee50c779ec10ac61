use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use redb::ReadableTable;

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::{Role, User, UserRecord};
use crate::security::token_digest;
use crate::AppState;

/// The authenticated caller, resolved once from the bearer token at the
/// request boundary. Handlers take this as an explicit parameter; nothing
/// deeper in the call chain re-derives the current user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: u64,
    pub record: UserRecord,
}

impl AuthUser {
    /// API-facing view of the caller
    pub fn to_api(&self) -> User {
        User::from_record(self.id, &self.record)
    }

    /// Require the admin role, rejecting customers with 403
    pub fn require_admin(&self) -> Result<()> {
        match self.record.role {
            Role::Admin => Ok(()),
            Role::Customer => Err(AppError::Forbidden),
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or(AppError::Unauthenticated)?;
        let digest = token_digest(token);

        let db = state.db.clone();
        let resolved = tokio::task::spawn_blocking(move || -> Result<Option<AuthUser>> {
            let read_txn = db.begin_read()?;

            let tokens = read_txn.open_table(tables::TOKENS)?;
            let Some(user_id) = tokens.get(digest.as_str())?.map(|v| v.value()) else {
                return Ok(None);
            };

            let users = read_txn.open_table(tables::USERS)?;
            let Some(bytes) = users.get(user_id)? else {
                // Token survived its user; treat as invalid.
                return Ok(None);
            };
            let record: UserRecord = bincode::deserialize(bytes.value())?;

            Ok(Some(AuthUser {
                id: user_id,
                record,
            }))
        })
        .await??;

        resolved.ok_or(AppError::Unauthenticated)
    }
}
