//! Ownership/role authorization for idea mutations.
//!
//! Every mutating operation funnels through [`authorize`] with the owner id
//! read back from the database immediately before the write, never a value
//! trusted from the request. That closes the gap between checking ownership
//! and acting on it.
//!
//! ## Rules
//!
//! ```text
//! edit / delete / finalize   caller.id == owner_id, else Forbidden
//! comment                    any authenticated caller (state gating is the
//!                            comment subsystem's job)
//! admin_override             caller.role == admin, ownership irrelevant
//! <no session>               Unauthenticated, for every action
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The acting user as established by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The mutations the guard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
    Finalize,
    Comment,
    AdminOverride,
}

/// Decide ALLOW/DENY for `action` by `user` against the idea owned by
/// `resource_owner_id`. `None` means no authenticated session.
pub fn authorize(
    action: Action,
    user: Option<&CurrentUser>,
    resource_owner_id: i64,
) -> Result<(), AppError> {
    let user = user.ok_or(AppError::Unauthenticated)?;

    match action {
        Action::Edit | Action::Delete | Action::Finalize => {
            if user.id == resource_owner_id {
                Ok(())
            } else {
                Err(AppError::Forbidden("not the idea owner".to_string()))
            }
        }
        Action::Comment => Ok(()),
        Action::AdminOverride => {
            if user.is_admin() {
                Ok(())
            } else {
                Err(AppError::Forbidden("admin role required".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64) -> CurrentUser {
        CurrentUser { id, role: Role::Member }
    }

    fn admin(id: i64) -> CurrentUser {
        CurrentUser { id, role: Role::Admin }
    }

    #[test]
    fn owner_may_edit_delete_finalize() {
        let u = member(7);
        for action in [Action::Edit, Action::Delete, Action::Finalize] {
            assert!(authorize(action, Some(&u), 7).is_ok());
        }
    }

    #[test]
    fn non_owner_denied_even_when_admin() {
        let a = admin(1);
        for action in [Action::Edit, Action::Delete, Action::Finalize] {
            let err = authorize(action, Some(&a), 7).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }

    #[test]
    fn admin_override_requires_admin_role() {
        assert!(authorize(Action::AdminOverride, Some(&admin(1)), 7).is_ok());
        let err = authorize(Action::AdminOverride, Some(&member(7)), 7).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn unauthenticated_denied_everything() {
        for action in [
            Action::Edit,
            Action::Delete,
            Action::Finalize,
            Action::Comment,
            Action::AdminOverride,
        ] {
            let err = authorize(action, None, 7).unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated));
        }
    }

    #[test]
    fn any_authenticated_user_may_comment() {
        assert!(authorize(Action::Comment, Some(&member(99)), 7).is_ok());
    }
}
