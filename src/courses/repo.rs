use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Course, CourseRow, CourseUpdate, NewCourse};
use crate::{db::Pagination, error::AppError};

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create(
        &self,
        bootcamp_id: Uuid,
        user_id: Uuid,
        course: NewCourse,
    ) -> Result<Course, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError>;
    async fn list(&self, page: Pagination) -> Result<Vec<Course>, AppError>;
    async fn list_by_bootcamp(&self, bootcamp_id: Uuid) -> Result<Vec<Course>, AppError>;
    async fn update(&self, id: Uuid, update: CourseUpdate) -> Result<Course, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    /// Returns the number of courses removed.
    async fn delete_by_bootcamp(&self, bootcamp_id: Uuid) -> Result<u64, AppError>;
    /// Removes the courses `user_id` created, whichever bootcamp they belong to.
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, AppError>;
}

pub(crate) fn course_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("No course with the id of {id}"))
}

const COLUMNS: &str = "id, bootcamp_id, user_id, title, description, weeks, tuition, \
     minimum_skill, scholarship_available, created_at";

fn into_courses(rows: Vec<CourseRow>) -> Result<Vec<Course>, AppError> {
    rows.into_iter()
        .map(|r| Course::try_from(r).map_err(AppError::Internal))
        .collect()
}

#[derive(Clone)]
pub struct PgCourses {
    db: PgPool,
}

impl PgCourses {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseStore for PgCourses {
    async fn create(
        &self,
        bootcamp_id: Uuid,
        user_id: Uuid,
        c: NewCourse,
    ) -> Result<Course, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            INSERT INTO courses (id, bootcamp_id, user_id, title, description, weeks, tuition,
                                 minimum_skill, scholarship_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(bootcamp_id)
        .bind(user_id)
        .bind(c.title)
        .bind(c.description)
        .bind(c.weeks)
        .bind(c.tuition)
        .bind(c.minimum_skill.as_str())
        .bind(c.scholarship_available)
        .fetch_one(&self.db)
        .await?;
        Course::try_from(row).map_err(AppError::Internal)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(Course::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Course>, AppError> {
        let page = page.bounded();
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM courses
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;
        into_courses(rows)
    }

    async fn list_by_bootcamp(&self, bootcamp_id: Uuid) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COLUMNS} FROM courses WHERE bootcamp_id = $1 ORDER BY created_at"
        ))
        .bind(bootcamp_id)
        .fetch_all(&self.db)
        .await?;
        into_courses(rows)
    }

    async fn update(&self, id: Uuid, u: CourseUpdate) -> Result<Course, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            UPDATE courses
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   weeks = COALESCE($4, weeks),
                   tuition = COALESCE($5, tuition),
                   minimum_skill = COALESCE($6, minimum_skill),
                   scholarship_available = COALESCE($7, scholarship_available)
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(u.title)
        .bind(u.description)
        .bind(u.weeks)
        .bind(u.tuition)
        .bind(u.minimum_skill.map(|s| s.as_str()))
        .bind(u.scholarship_available)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| course_not_found(id))?;
        Course::try_from(row).map_err(AppError::Internal)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(course_not_found(id));
        }
        Ok(())
    }

    async fn delete_by_bootcamp(&self, bootcamp_id: Uuid) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM courses WHERE bootcamp_id = $1")
            .bind(bootcamp_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM courses WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
