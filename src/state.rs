use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::repo::{PgUsers, UserStore},
    bootcamps::repo::{BootcampStore, PgBootcamps},
    config::AppConfig,
    courses::repo::{CourseStore, PgCourses},
    mail::{LettreMailer, Mailer},
    storage::{Storage, StorageClient},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub bootcamps: Arc<dyn BootcampStore>,
    pub courses: Arc<dyn CourseStore>,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init(config: AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let mailer = Arc::new(LettreMailer::new(&config.mail)?) as Arc<dyn Mailer>;
        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;

        Ok(Self {
            config: Arc::new(config),
            users: Arc::new(PgUsers::new(db.clone())),
            bootcamps: Arc::new(PgBootcamps::new(db.clone())),
            courses: Arc::new(PgCourses::new(db)),
            mailer,
            storage,
        })
    }
}
