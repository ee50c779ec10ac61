use axum::{extract::State, Json};
use chrono::Utc;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::MIN_PASSWORD_LENGTH;
use crate::db::{self, tables};
use crate::error::{AppError, Result, ValidationErrors};
use crate::models::user::is_well_formed_email;
use crate::models::{Role, User, UserRecord};
use crate::routes::validation::non_empty;
use crate::security::{generate_salt, generate_token, hash_password, token_digest, verify_password};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Token plus user returned by both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Register a new user
///
/// Creates a user with the customer role and issues a bearer token. The
/// admin role is assigned only when the address is provisioned in
/// `ADMIN_EMAILS`; the request payload never carries a role.
///
/// Email uniqueness is checked inside the write transaction, so two
/// concurrent registrations of the same address cannot both succeed.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let mut errors = ValidationErrors::default();

    let name = match non_empty(payload.name.as_deref()) {
        Some(name) => name.to_string(),
        None => {
            errors.add("name", "The name field is required.");
            String::new()
        }
    };

    let email = match non_empty(payload.email.as_deref()) {
        Some(email) if is_well_formed_email(email) => email.to_ascii_lowercase(),
        Some(_) => {
            errors.add("email", "The email must be a valid email address.");
            String::new()
        }
        None => {
            errors.add("email", "The email field is required.");
            String::new()
        }
    };

    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        errors.add("password", "The password field is required.");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!(
                "The password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            ),
        );
    }

    errors.into_result()?;

    let role = if state.config.is_admin_email(&email) {
        Role::Admin
    } else {
        Role::Customer
    };

    let password_hash = hash_password(&password, &generate_salt());
    let token = generate_token();
    let digest = token_digest(&token);

    let db = state.db.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<User> {
        let write_txn = db.begin_write()?;
        let user = {
            let mut by_email = write_txn.open_table(tables::USERS_BY_EMAIL)?;

            // Uniqueness check and insert share the serialized write
            // transaction, so no duplicate registration can slip through.
            if by_email.get(email.as_str())?.is_some() {
                tracing::info!("Registration rejected, email already taken");
                return Err(ValidationErrors::single(
                    "email",
                    "The email has already been taken.",
                ));
            }

            let user_id = db::next_id(&write_txn, db::USER_IDS)?;
            let record = UserRecord {
                name,
                email: email.clone(),
                password_hash,
                role,
                created_at: Utc::now().timestamp(),
            };

            let mut users = write_txn.open_table(tables::USERS)?;
            let bytes = bincode::serialize(&record)?;
            users.insert(user_id, bytes.as_slice())?;
            drop(users);

            by_email.insert(email.as_str(), user_id)?;
            drop(by_email);

            let mut tokens = write_txn.open_table(tables::TOKENS)?;
            tokens.insert(digest.as_str(), user_id)?;

            User::from_record(user_id, &record)
        };
        write_txn.commit()?;

        tracing::info!("New user registered: id={}", user.id);
        Ok(user)
    })
    .await??;

    Ok(Json(AuthResponse { token, user }))
}

/// Log in with email and password
///
/// Unknown email and wrong password produce the identical 401 response, so
/// nothing in the reply reveals whether an account exists. A fresh token is
/// issued on every login; previously issued tokens stay valid.
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let mut errors = ValidationErrors::default();

    let email = match non_empty(payload.email.as_deref()) {
        Some(email) => email.to_ascii_lowercase(),
        None => {
            errors.add("email", "The email field is required.");
            String::new()
        }
    };

    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        errors.add("password", "The password field is required.");
    }

    errors.into_result()?;

    let token = generate_token();
    let digest = token_digest(&token);

    let db = state.db.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<User> {
        let write_txn = db.begin_write()?;
        let user = {
            let by_email = write_txn.open_table(tables::USERS_BY_EMAIL)?;
            let Some(user_id) = by_email.get(email.as_str())?.map(|v| v.value()) else {
                return Err(AppError::InvalidCredentials);
            };
            drop(by_email);

            let users = write_txn.open_table(tables::USERS)?;
            let record: UserRecord = users
                .get(user_id)?
                .map(|bytes| bincode::deserialize(bytes.value()))
                .transpose()?
                .ok_or(AppError::InvalidCredentials)?;
            drop(users);

            if !verify_password(&password, &record.password_hash) {
                return Err(AppError::InvalidCredentials);
            }

            let mut tokens = write_txn.open_table(tables::TOKENS)?;
            tokens.insert(digest.as_str(), user_id)?;

            User::from_record(user_id, &record)
        };
        write_txn.commit()?;

        tracing::info!("User logged in: id={}", user.id);
        Ok(user)
    })
    .await??;

    Ok(Json(AuthResponse { token, user }))
}

/// Return the authenticated caller's own profile
pub async fn current_user(auth: AuthUser) -> Json<User> {
    Json(auth.to_api())
}
