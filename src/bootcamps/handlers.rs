use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateBootcampRequest, UpdateBootcampRequest},
    repo::bootcamp_not_found,
    services::{self, UploadItem},
};
use crate::{
    auth::{
        extractors::AuthUser,
        guard::{authorize_owned, require_role},
        repo_types::Role,
    },
    db::Pagination,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

const PHOTO_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn bootcamp_routes() -> Router<AppState> {
    Router::new()
        .route("/bootcamps", get(list_bootcamps).post(create_bootcamp))
        .route(
            "/bootcamps/:id",
            get(get_bootcamp).put(update_bootcamp).delete(delete_bootcamp),
        )
        .route(
            "/bootcamps/:id/photo",
            put(upload_photo).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
}

#[instrument(skip(state))]
pub async fn list_bootcamps(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Value>, AppError> {
    let bootcamps = state.bootcamps.list(page).await?;
    Ok(Json(json!({
        "success": true,
        "count": bootcamps.len(),
        "data": bootcamps,
    })))
}

#[instrument(skip(state))]
pub async fn get_bootcamp(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let bootcamp = state
        .bootcamps
        .find_by_id(id)
        .await?
        .ok_or_else(|| bootcamp_not_found(id))?;
    Ok(Json(json!({ "success": true, "data": bootcamp })))
}

/// One bootcamp per publisher; admins may create any number.
#[instrument(skip_all)]
pub async fn create_bootcamp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateBootcampRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;

    if user.role != Role::Admin && state.bootcamps.find_by_owner(user.id).await?.is_some() {
        return Err(AppError::Validation(format!(
            "The user with ID {} has already published a bootcamp",
            user.id
        )));
    }

    let new = payload.validate()?;
    let bootcamp = state.bootcamps.create(user.id, new).await?;
    info!(bootcamp_id = %bootcamp.id, user_id = %user.id, "bootcamp created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": bootcamp })),
    ))
}

#[instrument(skip_all)]
pub async fn update_bootcamp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateBootcampRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let existing = state.bootcamps.find_by_id(id).await?;
    authorize_owned(
        &user,
        existing,
        || bootcamp_not_found(id).to_string(),
        "update this bootcamp",
    )?;

    let update = payload.validate()?;
    let bootcamp = state.bootcamps.update(id, update).await?;
    Ok(Json(json!({ "success": true, "data": bootcamp })))
}

#[instrument(skip_all)]
pub async fn delete_bootcamp(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let existing = state.bootcamps.find_by_id(id).await?;
    let bootcamp = authorize_owned(
        &user,
        existing,
        || bootcamp_not_found(id).to_string(),
        "delete this bootcamp",
    )?;

    services::delete_bootcamp(&state, &bootcamp).await?;
    Ok(Json(json!({ "success": true, "data": {} })))
}

/// PUT /bootcamps/:id/photo (multipart, field `file`)
#[instrument(skip_all)]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let existing = state.bootcamps.find_by_id(id).await?;
    let bootcamp = authorize_owned(
        &user,
        existing,
        || bootcamp_not_found(id).to_string(),
        "update this bootcamp",
    )?;
    let mut mp = mp?;

    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        let file_name = field.file_name().map(str::to_string);
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        upload = Some(UploadItem { body, content_type, file_name });
        break;
    }
    let upload = upload.ok_or_else(|| AppError::Validation("Please upload a file".into()))?;

    let file_name = services::upload_photo(&state, &bootcamp, upload).await?;
    Ok(Json(json!({ "success": true, "data": file_name })))
}
