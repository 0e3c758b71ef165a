//! Password-reset tokens: plaintext goes out by email, only the SHA-256
//! digest and an expiry are kept on the user.

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use tracing::{error, info, warn};

use super::{
    password::hash_password_blocking,
    repo::UserStore,
    repo_types::{ResetTokenState, User},
};
use crate::{error::AppError, mail::Mailer, validation};

const TOKEN_BYTES: usize = 20;

pub struct ResetToken {
    pub plaintext: String,
    pub state: ResetTokenState,
}

impl ResetToken {
    pub fn generate(now: OffsetDateTime, ttl: Duration) -> Self {
        let mut raw = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut raw);
        let plaintext: String = raw.iter().map(|b| format!("{b:02x}")).collect();
        let state = ResetTokenState {
            token_hash: hash_token(&plaintext),
            expires_at: now + ttl,
        };
        Self { plaintext, state }
    }
}

pub fn hash_token(plaintext: &str) -> String {
    format!("{:x}", Sha256::digest(plaintext.as_bytes()))
}

pub fn reset_url(base_url: &str, plaintext: &str) -> String {
    format!("{base_url}/api/v1/auth/resetpassword/{plaintext}")
}

/// Issues a reset token for `email` and mails the link.
///
/// If the mail cannot be sent the stored token is cleared again.
pub async fn request_reset(
    users: &dyn UserStore,
    mailer: &dyn Mailer,
    email: &str,
    base_url: &str,
    ttl: Duration,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    let email = validation::normalize_email(email);
    let user = users
        .find_by_email(&email, false)
        .await?
        .ok_or_else(|| AppError::NotFound("There is no user with that email".into()))?;

    let token = ResetToken::generate(now, ttl);
    users.set_reset_token(user.id, Some(token.state)).await?;

    let url = reset_url(base_url, &token.plaintext);
    let message = format!(
        "You are receiving this email because you (or someone else) has requested the reset \
         of a password. Please make a PUT request to: \n\n {url}"
    );

    if let Err(e) = mailer.send(&user.email, "Password reset token", &message).await {
        error!(error = %e, user_id = %user.id, "reset email failed; clearing token");
        users.set_reset_token(user.id, None).await?;
        return Err(AppError::EmailDelivery);
    }

    info!(user_id = %user.id, "password reset email sent");
    Ok(())
}

/// Consumes a reset token and sets the new password; returns the user for auto-login.
pub async fn confirm_reset(
    users: &dyn UserStore,
    plaintext: &str,
    new_password: &str,
    now: OffsetDateTime,
) -> Result<User, AppError> {
    validation::password(new_password)?;

    let hash = hash_password_blocking(new_password.to_string()).await?;
    let user = users
        .complete_password_reset(&hash_token(plaintext), now, &hash)
        .await?
        .ok_or_else(|| {
            warn!("invalid or expired reset token");
            AppError::InvalidOrExpiredToken
        })?;

    info!(user_id = %user.id, "password reset completed");
    Ok(user)
}
