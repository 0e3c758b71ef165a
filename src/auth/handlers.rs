use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::{
        cookie::clear_cookie,
        dto::{
            ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
            UpdateDetailsRequest, UpdatePasswordRequest, UserBody,
        },
        extractors::AuthUser,
        reset,
        services::{authenticate, change_password, register_user, TokenResponse},
    },
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
        .route("/auth/logout", get(logout))
        .route("/auth/updatedetails", put(update_details))
        .route("/auth/updatepassword", put(update_password))
        .route("/auth/forgotpassword", post(forgot_password))
        .route("/auth/resetpassword/:token", put(reset_password))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<TokenResponse, AppError> {
    let user = register_user(state.users.as_ref(), payload).await?;
    TokenResponse::issue(&state, user.id)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<TokenResponse, AppError> {
    let user = authenticate(state.users.as_ref(), payload).await?;
    TokenResponse::issue(&state, user.id)
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserBody> {
    Json(UserBody { success: true, user })
}

/// Clears the cookie only; the token itself stays valid until it expires.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie(&state.config.cookie))],
        Json(json!({ "success": true, "data": {} })),
    )
}

#[instrument(skip_all)]
pub async fn update_details(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<UpdateDetailsRequest>,
) -> Result<Json<UserBody>, AppError> {
    let update = payload.validate()?;
    let user = state.users.update_details(user.id, update).await?;
    Ok(Json(UserBody { success: true, user }))
}

#[instrument(skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<UpdatePasswordRequest>,
) -> Result<TokenResponse, AppError> {
    change_password(
        state.users.as_ref(),
        user.id,
        payload.current_password,
        payload.new_password,
    )
    .await?;
    TokenResponse::issue(&state, user.id)
}

fn public_base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.reset.public_url {
        return url.clone();
    }
    let scheme = if state.config.cookie.secure { "https" } else { "http" };
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let base_url = public_base_url(&state, &headers);
    reset::request_reset(
        state.users.as_ref(),
        state.mailer.as_ref(),
        &payload.email,
        &base_url,
        Duration::minutes(state.config.reset.ttl_minutes),
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(json!({ "success": true, "data": "Email Sent" })))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<TokenResponse, AppError> {
    let user = reset::confirm_reset(
        state.users.as_ref(),
        &token,
        &payload.password,
        OffsetDateTime::now_utc(),
    )
    .await?;
    TokenResponse::issue(&state, user.id)
}
