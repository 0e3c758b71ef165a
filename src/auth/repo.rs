use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, ResetTokenState, User, UserDetailsUpdate, UserRow},
    db::Pagination,
    error::AppError,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: Uuid, include_password: bool) -> Result<Option<User>, AppError>;
    async fn find_by_email(
        &self,
        email: &str,
        include_password: bool,
    ) -> Result<Option<User>, AppError>;
    async fn list(&self, page: Pagination) -> Result<Vec<User>, AppError>;
    async fn update_details(&self, id: Uuid, update: UserDetailsUpdate) -> Result<User, AppError>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError>;
    /// Writes only the reset columns; `None` clears them.
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<ResetTokenState>,
    ) -> Result<(), AppError>;
    /// Sets the password and clears the reset columns of the user whose stored
    /// hash matches and whose expiry is strictly after `now`, in one write.
    /// `None` when no such user exists (unknown, expired or already consumed).
    async fn complete_password_reset(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
        password_hash: &str,
    ) -> Result<Option<User>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

pub(crate) fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User not found with id of {id}"))
}

const PUBLIC_COLUMNS: &str = "id, name, email, role, NULL::text AS password_hash, \
     reset_password_token, reset_password_expire, created_at";
const ALL_COLUMNS: &str = "id, name, email, role, password_hash, \
     reset_password_token, reset_password_expire, created_at";

fn columns(include_password: bool) -> &'static str {
    if include_password {
        ALL_COLUMNS
    } else {
        PUBLIC_COLUMNS
    }
}

fn into_user(row: UserRow) -> Result<User, AppError> {
    User::try_from(row).map_err(AppError::Internal)
}

#[derive(Clone)]
pub struct PgUsers {
    db: PgPool,
}

impl PgUsers {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUsers {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PUBLIC_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await?;
        into_user(row)
    }

    async fn find_by_id(&self, id: Uuid, include_password: bool) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            columns(include_password)
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
        include_password: bool,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            columns(include_password)
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn list(&self, page: Pagination) -> Result<Vec<User>, AppError> {
        let page = page.bounded();
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {PUBLIC_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_user).collect()
    }

    async fn update_details(&self, id: Uuid, update: UserDetailsUpdate) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   role = COALESCE($4, role)
             WHERE id = $1
            RETURNING {PUBLIC_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.role.map(|r| r.as_str()))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| user_not_found(id))?;
        into_user(row)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let res = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<ResetTokenState>,
    ) -> Result<(), AppError> {
        let (hash, expires_at) = match token {
            Some(t) => (Some(t.token_hash), Some(t.expires_at)),
            None => (None, None),
        };
        let res = sqlx::query(
            r#"
            UPDATE users
               SET reset_password_token = $2,
                   reset_password_expire = $3
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;
        if res.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
               SET password_hash = $3,
                   reset_password_token = NULL,
                   reset_password_expire = NULL
             WHERE reset_password_token = $1
               AND reset_password_expire > $2
            RETURNING {PUBLIC_COLUMNS}
            "#
        ))
        .bind(token_hash)
        .bind(now)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }
}
