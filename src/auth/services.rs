use axum::{
    extract::FromRef,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    cookie::session_cookie,
    dto::{LoginRequest, RegisterRequest, TokenBody},
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::{error::AppError, state::AppState, validation};

/// Signed session token plus the cookie that carries it.
pub struct TokenResponse {
    pub token: String,
    pub cookie: String,
}

impl TokenResponse {
    pub fn issue(state: &AppState, user_id: Uuid) -> Result<Self, AppError> {
        let keys = JwtKeys::from_ref(state);
        let token = keys.sign(user_id)?;
        let cookie = session_cookie(&token, &state.config.cookie);
        Ok(Self { token, cookie })
    }
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::SET_COOKIE, self.cookie)],
            Json(TokenBody {
                success: true,
                token: self.token,
            }),
        )
            .into_response()
    }
}

pub async fn register_user(users: &dyn UserStore, req: RegisterRequest) -> Result<User, AppError> {
    let req = req.validate()?;
    let password_hash = hash_password_blocking(req.password).await?;
    let user = users
        .create(NewUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
            role: req.role.unwrap_or_default(),
        })
        .await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

fn invalid_credentials() -> AppError {
    AppError::NotAuthenticated("Invalid credentials".into())
}

/// Checks email and password; unknown email and wrong password are indistinguishable.
pub async fn authenticate(users: &dyn UserStore, req: LoginRequest) -> Result<User, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Please provide an email and password".into()));
    }
    let email = validation::normalize_email(&req.email);

    let user = users.find_by_email(&email, true).await?.ok_or_else(|| {
        warn!(email = %email, "login unknown email");
        invalid_credentials()
    })?;
    let hash = user.password_hash.clone().ok_or_else(invalid_credentials)?;

    if !verify_password_blocking(req.password, hash).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

pub async fn change_password(
    users: &dyn UserStore,
    user_id: Uuid,
    current: String,
    new: String,
) -> Result<(), AppError> {
    let user = users
        .find_by_id(user_id, true)
        .await?
        .ok_or_else(AppError::not_authorized)?;
    let hash = user.password_hash.ok_or_else(AppError::not_authorized)?;

    if !verify_password_blocking(current, hash).await? {
        warn!(user_id = %user_id, "update password with wrong current password");
        return Err(AppError::NotAuthenticated("Password is incorrect".into()));
    }
    validation::password(&new)?;

    let new_hash = hash_password_blocking(new).await?;
    users.update_password(user_id, &new_hash).await?;
    info!(user_id = %user_id, "password updated");
    Ok(())
}
