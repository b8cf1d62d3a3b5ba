use actix_session::Session;

use crate::auth::guard::{CurrentUser, Role};
use crate::errors::AppError;

/// Read the acting user out of the cookie session. `None` when the session
/// carries no login or the stored role no longer parses.
pub fn current_user(session: &Session) -> Option<CurrentUser> {
    let id = session.get::<i64>("user_id").unwrap_or(None)?;
    let role = session
        .get::<String>("role")
        .unwrap_or(None)
        .and_then(|r| Role::parse(&r))?;
    Some(CurrentUser { id, role })
}

/// Like [`current_user`] but an error for handlers that require a login.
pub fn require_user(session: &Session) -> Result<CurrentUser, AppError> {
    current_user(session).ok_or(AppError::Unauthenticated)
}

/// Require an authenticated admin; used by the administrative handlers.
pub fn require_admin(session: &Session) -> Result<CurrentUser, AppError> {
    let user = require_user(session)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(AppError::Forbidden("admin role required".to_string()))
    }
}

/// Store the login in the session after credential verification.
pub fn establish(session: &Session, user: &CurrentUser, username: &str) {
    let _ = session.insert("user_id", user.id);
    let _ = session.insert("role", user.role.as_str());
    let _ = session.insert("username", username);
}
