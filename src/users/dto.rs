use serde::Deserialize;

use crate::{
    auth::repo_types::{Role, UserDetailsUpdate},
    error::AppError,
    validation,
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl CreateUserRequest {
    pub fn validate(mut self) -> Result<Self, AppError> {
        self.email = validation::normalize_email(&self.email);
        validation::required("name", &self.name, None)?;
        validation::email(&self.email)?;
        validation::password(&self.password)?;
        self.name = self.name.trim().to_string();
        Ok(self)
    }
}

/// Admin edit; unlike self-service it may change the role.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
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
            role: self.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_assign_any_role() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"name":"Root","email":"Root@X.com","password":"secret123","role":"admin"}"#,
        )
        .unwrap();
        let req = req.validate().unwrap();
        assert_eq!(req.role, Role::Admin);
        assert_eq!(req.email, "root@x.com");
    }

    #[test]
    fn update_carries_role() {
        let update = UpdateUserRequest { role: Some(Role::Publisher), ..Default::default() }
            .validate()
            .unwrap();
        assert_eq!(update.role, Some(Role::Publisher));
        assert!(UpdateUserRequest { email: Some("nope".into()), ..Default::default() }
            .validate()
            .is_err());
    }
}
