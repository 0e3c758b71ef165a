use serde::{Deserialize, Serialize};

use super::repo_types::{Role, User, UserDetailsUpdate};
use crate::{error::AppError, validation};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl RegisterRequest {
    pub fn validate(mut self) -> Result<Self, AppError> {
        self.email = validation::normalize_email(&self.email);
        validation::required("name", &self.name, None)?;
        validation::email(&self.email)?;
        validation::password(&self.password)?;
        if self.role == Some(Role::Admin) {
            return Err(AppError::Validation("Role admin can not be self-assigned".into()));
        }
        Ok(self)
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateDetailsRequest {
    pub fn validate(self) -> Result<UserDetailsUpdate, AppError> {
        if let Some(name) = &self.name {
            validation::required("name", name, None)?;
        }
        let email = self.email.map(|e| validation::normalize_email(&e));
        if let Some(email) = &email {
            validation::email(email)?;
        }
        Ok(UserDetailsUpdate {
            name: self.name.map(|n| n.trim().to_string()),
            email,
            role: None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Body of every response that issues a session token.
#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub success: bool,
    pub user: User,
}
