use uuid::Uuid;

use super::repo_types::{Role, User};
use crate::error::AppError;

/// A record whose mutation is restricted to its creator or an admin.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

pub fn require_role(caller: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&caller.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            caller.role
        )))
    }
}

pub fn is_owner_or_admin<R: Owned>(caller: &User, resource: &R) -> bool {
    resource.owner_id() == caller.id || caller.role == Role::Admin
}

/// Resolves a loaded resource for mutation by `caller`.
///
/// `not_found` names the missing resource; `action` completes the sentence
/// "User <id> is not authorized to ...".
pub fn authorize_owned<R: Owned>(
    caller: &User,
    resource: Option<R>,
    not_found: impl FnOnce() -> String,
    action: &str,
) -> Result<R, AppError> {
    let resource = resource.ok_or_else(|| AppError::NotFound(not_found()))?;
    if !is_owner_or_admin(caller, &resource) {
        return Err(AppError::Forbidden(format!(
            "User {} is not authorized to {action}",
            caller.id
        )));
    }
    Ok(resource)
}
