use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest};
use crate::{
    auth::{
        extractors::AdminUser, password::hash_password_blocking, repo::user_not_found,
        repo_types::NewUser,
    },
    bootcamps::services::delete_bootcamp,
    db::Pagination,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
}

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Value>, AppError> {
    let users = state.users.list(page).await?;
    Ok(Json(json!({
        "success": true,
        "count": users.len(),
        "data": users,
    })))
}

#[instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_id(id, false)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(json!({ "success": true, "data": user })))
}

#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let req = payload.validate()?;
    let password_hash = hash_password_blocking(req.password).await?;
    let user = state
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        })
        .await?;
    info!(user_id = %user.id, admin_id = %admin.id, role = %user.role, "user created by admin");
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": user }))))
}

#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let update = payload.validate()?;
    let user = state.users.update_details(id, update).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

#[instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .users
        .find_by_id(id, false)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    // Removes each bootcamp's courses and stored photo.
    for bootcamp in state.bootcamps.list_by_owner(id).await? {
        delete_bootcamp(&state, &bootcamp).await?;
    }
    let courses = state.courses.delete_by_owner(id).await?;
    state.users.delete(id).await?;
    info!(user_id = %id, admin_id = %admin.id, courses, "user deleted");
    Ok(Json(json!({ "success": true, "data": {} })))
}
