use serde::Deserialize;
use tracing::warn;

pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;
pub const MAX_COOKIE_EXPIRE_DAYS: i64 = 365;
pub const MAX_RESET_TTL_MINUTES: i64 = 60 * 24;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub expire_days: i64,
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetConfig {
    pub ttl_minutes: i64,
    /// Base for reset links; falls back to the request Host header.
    pub public_url: Option<String>,
}

impl ResetConfig {
    /// Reset links would be built from a client-supplied Host header in production.
    pub fn links_follow_host_header(&self, production: bool) -> bool {
        production && self.public_url.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub enum MailTransportConfig {
    Smtp {
        host: String,
        port: u16,
        username: String,
        password: String,
    },
    /// Writes each message as a file, for local development.
    File { dir: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub transport: MailTransportConfig,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub reset: ResetConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
    pub max_file_upload: usize,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Like `env_parse`, clamped to `0..=max`.
fn env_bounded(key: &str, default: i64, max: i64) -> i64 {
    let value = env_parse(key, default);
    if !(0..=max).contains(&value) {
        warn!(key, value, max, "config value out of range, clamping");
    }
    value.clamp(0, max)
}

fn public_url_from(raw: Option<String>) -> Option<String> {
    raw.map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let production = env_or("APP_ENV", "development") == "production";

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "devcamper"),
            audience: env_or("JWT_AUDIENCE", "devcamper-users"),
            ttl_minutes: env_bounded("JWT_TTL_MINUTES", 60 * 24 * 30, MAX_JWT_TTL_MINUTES),
        };

        let cookie = CookieConfig {
            name: "token".into(),
            expire_days: env_bounded("JWT_COOKIE_EXPIRE_DAYS", 30, MAX_COOKIE_EXPIRE_DAYS),
            secure: production,
        };

        let reset = ResetConfig {
            ttl_minutes: env_bounded("RESET_TOKEN_TTL_MINUTES", 10, MAX_RESET_TTL_MINUTES),
            public_url: public_url_from(std::env::var("APP_PUBLIC_URL").ok()),
        };
        if reset.links_follow_host_header(production) {
            warn!("APP_PUBLIC_URL is unset; password reset links will use the request Host header");
        }

        let transport = match std::env::var("SMTP_HOST") {
            Ok(host) => MailTransportConfig::Smtp {
                host,
                port: env_parse("SMTP_PORT", 587),
                username: std::env::var("SMTP_USERNAME")?,
                password: std::env::var("SMTP_PASSWORD")?,
            },
            Err(_) => MailTransportConfig::File {
                dir: env_or("MAIL_FILE_DIR", "./emails"),
            },
        };
        let mail = MailConfig {
            transport,
            from_email: env_or("FROM_EMAIL", "noreply@devcamper.io"),
            from_name: env_or("FROM_NAME", "DevCamper"),
        };

        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: env_or("MINIO_BUCKET", "devcamper"),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: env_or("MINIO_REGION", "us-east-1"),
        };

        Ok(Self {
            database_url,
            jwt,
            cookie,
            reset,
            mail,
            storage,
            max_file_upload: env_parse("MAX_FILE_UPLOAD", 1_000_000),
        })
    }
}
