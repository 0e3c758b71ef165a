use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateCourseRequest, UpdateCourseRequest},
    repo::course_not_found,
};
use crate::{
    auth::{
        extractors::AuthUser,
        guard::{authorize_owned, require_role},
        repo_types::Role,
    },
    bootcamps::{repo::bootcamp_not_found, repo_types::BootcampSummary},
    db::Pagination,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route(
            "/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route(
            "/bootcamps/:id/courses",
            get(list_bootcamp_courses).post(create_course),
        )
}

fn list_body<T: serde::Serialize>(items: Vec<T>) -> Json<Value> {
    Json(json!({
        "success": true,
        "count": items.len(),
        "data": items,
    }))
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Value>, AppError> {
    Ok(list_body(state.courses.list(page).await?))
}

#[instrument(skip(state))]
pub async fn list_bootcamp_courses(
    State(state): State<AppState>,
    AppPath(bootcamp_id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    Ok(list_body(state.courses.list_by_bootcamp(bootcamp_id).await?))
}

/// Course with its bootcamp summary in place of the bare id.
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let course = state
        .courses
        .find_by_id(id)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    let bootcamp = state
        .bootcamps
        .find_by_id(course.bootcamp_id)
        .await?
        .map(|b| BootcampSummary::from(&b));

    let mut data = serde_json::to_value(&course).map_err(anyhow::Error::from)?;
    if let Some(summary) = bootcamp {
        data["bootcamp"] = serde_json::to_value(summary).map_err(anyhow::Error::from)?;
    }
    Ok(Json(json!({ "success": true, "data": data })))
}

#[instrument(skip_all)]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(bootcamp_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let bootcamp = state.bootcamps.find_by_id(bootcamp_id).await?;
    let bootcamp = authorize_owned(
        &user,
        bootcamp,
        || bootcamp_not_found(bootcamp_id).to_string(),
        &format!("add a course to bootcamp {bootcamp_id}"),
    )?;

    let new = payload.validate()?;
    let course = state.courses.create(bootcamp.id, user.id, new).await?;
    info!(course_id = %course.id, bootcamp_id = %bootcamp.id, "course created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": course })),
    ))
}

#[instrument(skip_all)]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let existing = state.courses.find_by_id(id).await?;
    authorize_owned(
        &user,
        existing,
        || course_not_found(id).to_string(),
        &format!("update course {id}"),
    )?;

    let update = payload.validate()?;
    let course = state.courses.update(id, update).await?;
    Ok(Json(json!({ "success": true, "data": course })))
}

#[instrument(skip_all)]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Publisher, Role::Admin])?;
    let existing = state.courses.find_by_id(id).await?;
    authorize_owned(
        &user,
        existing,
        || course_not_found(id).to_string(),
        &format!("delete course {id}"),
    )?;

    state.courses.delete(id).await?;
    info!(course_id = %id, user_id = %user.id, "course deleted");
    Ok(Json(json!({ "success": true, "data": {} })))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        auth::repo_types::Role,
        test_utils::{body_json, seed_bootcamp, seed_course, seed_user, TestContext},
    };

    fn authed(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn new_course() -> Value {
        json!({
            "title": "Front End Web Development",
            "description": "HTML, CSS and JavaScript",
            "weeks": 8,
            "tuition": 8000,
            "minimum_skill": "beginner",
            "scholarship_available": true
        })
    }

    #[tokio::test]
    async fn get_course_embeds_bootcamp_summary() {
        let ctx = TestContext::new();
        let owner = seed_user(&ctx.users, "pub@x.com", "secret123", Role::Publisher).await;
        let bootcamp = seed_bootcamp(&ctx.bootcamps, owner.id, "Devworks").await;
        let course = seed_course(&ctx.courses, &bootcamp, "Front End").await;
        let app = build_app(ctx.state.clone());

        let res = app
            .clone()
            .oneshot(get(&format!("/api/v1/courses/{}", course.id)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"]["bootcamp"]["id"], bootcamp.id.to_string());
        assert_eq!(body["data"]["bootcamp"]["name"], "Devworks");

        let res = app
            .oneshot(get(&format!("/api/v1/bootcamps/{}/courses", bootcamp.id)))
            .await
            .unwrap();
        assert_eq!(body_json(res).await["count"], 1);
    }

    #[tokio::test]
    async fn missing_course_is_404() {
        let ctx = TestContext::new();
        let app = build_app(ctx.state.clone());
        let id = uuid::Uuid::new_v4();
        let res = app.oneshot(get(&format!("/api/v1/courses/{id}"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], format!("No course with the id of {id}"));
    }

    #[tokio::test]
    async fn owner_adds_course_to_own_bootcamp() {
        let ctx = TestContext::new();
        let owner = seed_user(&ctx.users, "pub@x.com", "secret123", Role::Publisher).await;
        let bootcamp = seed_bootcamp(&ctx.bootcamps, owner.id, "Devworks").await;
        let app = build_app(ctx.state.clone());

        let res = app
            .oneshot(authed(
                "POST",
                &format!("/api/v1/bootcamps/{}/courses", bootcamp.id),
                &ctx.token_for(owner.id),
                new_course(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert_eq!(body["data"]["bootcamp"], bootcamp.id.to_string());
        assert_eq!(body["data"]["user"], owner.id.to_string());
    }

    #[tokio::test]
    async fn adding_course_checks_bootcamp_and_owner() {
        let ctx = TestContext::new();
        let owner = seed_user(&ctx.users, "pub@x.com", "secret123", Role::Publisher).await;
        let other = seed_user(&ctx.users, "other@x.com", "secret123", Role::Publisher).await;
        let bootcamp = seed_bootcamp(&ctx.bootcamps, owner.id, "Devworks").await;
        let app = build_app(ctx.state.clone());

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/api/v1/bootcamps/{}/courses", uuid::Uuid::new_v4()),
                &ctx.token_for(owner.id),
                new_course(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app
            .oneshot(authed(
                "POST",
                &format!("/api/v1/bootcamps/{}/courses", bootcamp.id),
                &ctx.token_for(other.id),
                new_course(),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(ctx.courses.count(), 0);
    }

    #[tokio::test]
    async fn only_owner_or_admin_mutates_course() {
        let ctx = TestContext::new();
        let owner = seed_user(&ctx.users, "pub@x.com", "secret123", Role::Publisher).await;
        let other = seed_user(&ctx.users, "other@x.com", "secret123", Role::Publisher).await;
        let admin = seed_user(&ctx.users, "admin@x.com", "secret123", Role::Admin).await;
        let bootcamp = seed_bootcamp(&ctx.bootcamps, owner.id, "Devworks").await;
        let course = seed_course(&ctx.courses, &bootcamp, "Front End").await;
        let app = build_app(ctx.state.clone());
        let uri = format!("/api/v1/courses/{}", course.id);

        let res = app
            .clone()
            .oneshot(authed("PUT", &uri, &ctx.token_for(other.id), json!({ "weeks": 10 })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .clone()
            .oneshot(authed("PUT", &uri, &ctx.token_for(owner.id), json!({ "weeks": 10 })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["data"]["weeks"], 10);

        let res = app
            .oneshot(authed("DELETE", &uri, &ctx.token_for(admin.id), Value::Null))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(ctx.courses.count(), 0);
    }
}
