use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Bootcamp, BootcampUpdate, NewBootcamp, DEFAULT_PHOTO};
use crate::{db::Pagination, error::AppError};

#[async_trait]
pub trait BootcampStore: Send + Sync {
    async fn create(&self, user_id: Uuid, bootcamp: NewBootcamp) -> Result<Bootcamp, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, AppError>;
    /// Any bootcamp owned by `user_id`.
    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Bootcamp>, AppError>;
    /// Every bootcamp owned by `user_id` (admins may own several).
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Bootcamp>, AppError>;
    async fn list(&self, page: Pagination) -> Result<Vec<Bootcamp>, AppError>;
    async fn update(&self, id: Uuid, update: BootcampUpdate) -> Result<Bootcamp, AppError>;
    async fn set_photo(&self, id: Uuid, photo: &str) -> Result<(), AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub(crate) fn bootcamp_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Bootcamp not found with id of {id}"))
}

const COLUMNS: &str = "id, user_id, name, description, website, phone, email, address, careers, \
     housing, job_assistance, job_guarantee, accept_gi, photo, created_at";

#[derive(Clone)]
pub struct PgBootcamps {
    db: PgPool,
}

impl PgBootcamps {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BootcampStore for PgBootcamps {
    async fn create(&self, user_id: Uuid, b: NewBootcamp) -> Result<Bootcamp, AppError> {
        let row = sqlx::query_as::<_, Bootcamp>(&format!(
            r#"
            INSERT INTO bootcamps (id, user_id, name, description, website, phone, email,
                                   address, careers, housing, job_assistance, job_guarantee,
                                   accept_gi, photo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(b.name)
        .bind(b.description)
        .bind(b.website)
        .bind(b.phone)
        .bind(b.email)
        .bind(b.address)
        .bind(b.careers)
        .bind(b.housing)
        .bind(b.job_assistance)
        .bind(b.job_guarantee)
        .bind(b.accept_gi)
        .bind(DEFAULT_PHOTO)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, AppError> {
        let row = sqlx::query_as::<_, Bootcamp>(&format!(
            "SELECT {COLUMNS} FROM bootcamps WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Bootcamp>, AppError> {
        let row = sqlx::query_as::<_, Bootcamp>(&format!(
            "SELECT {COLUMNS} FROM bootcamps WHERE user_id = $1 LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Bootcamp>, AppError> {
        let rows = sqlx::query_as::<_, Bootcamp>(&format!(
            "SELECT {COLUMNS} FROM bootcamps WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Bootcamp>, AppError> {
        let page = page.bounded();
        let rows = sqlx::query_as::<_, Bootcamp>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM bootcamps
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, u: BootcampUpdate) -> Result<Bootcamp, AppError> {
        sqlx::query_as::<_, Bootcamp>(&format!(
            r#"
            UPDATE bootcamps
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   website = COALESCE($4, website),
                   phone = COALESCE($5, phone),
                   email = COALESCE($6, email),
                   address = COALESCE($7, address),
                   careers = COALESCE($8, careers),
                   housing = COALESCE($9, housing),
                   job_assistance = COALESCE($10, job_assistance),
                   job_guarantee = COALESCE($11, job_guarantee),
                   accept_gi = COALESCE($12, accept_gi)
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(u.name)
        .bind(u.description)
        .bind(u.website)
        .bind(u.phone)
        .bind(u.email)
        .bind(u.address)
        .bind(u.careers)
        .bind(u.housing)
        .bind(u.job_assistance)
        .bind(u.job_guarantee)
        .bind(u.accept_gi)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| bootcamp_not_found(id))
    }

    async fn set_photo(&self, id: Uuid, photo: &str) -> Result<(), AppError> {
        let res = sqlx::query("UPDATE bootcamps SET photo = $2 WHERE id = $1")
            .bind(id)
            .bind(photo)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(bootcamp_not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(bootcamp_not_found(id));
        }
        Ok(())
    }
}
