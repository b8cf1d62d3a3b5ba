use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::guard::{CurrentUser, Role};
use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::{current_user, establish};
use crate::auth::{password, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, LoginRequest, NewUser, RegisterRequest, UserView};

/// POST /api/v1/auth/register - Create an account and log it in
pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_username(&body.username));
    errors.extend(validate::validate_password(&body.password));
    if let Some(name) = &body.display_name {
        errors.extend(validate::validate_optional(name, "Display name", 100));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let username = body.username.trim().to_string();
    if user::username_exists(&pool, &username).await? {
        return Err(AppError::Conflict("username is already taken".to_string()));
    }

    let hashed = password::hash_password(&body.password)?;
    let new_user = NewUser {
        username: username.clone(),
        password: hashed,
        display_name: body
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&username)
            .to_string(),
        role: Role::Member,
    };
    let id = user::create(&pool, &new_user).await?;

    let current = CurrentUser { id, role: Role::Member };
    establish(&session, &current, &username);

    let created = user::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::Internal("created user not found on re-read".to_string()))?;
    Ok(HttpResponse::Created().json(UserView::from(&created)))
}

/// POST /api/v1/auth/login - Verify credentials and establish a session
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginRequest>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check before any database access.
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return Ok(HttpResponse::TooManyRequests().json(serde_json::json!({
            "error": "rate_limited",
            "message": "Too many failed login attempts; try again later",
        })));
    }

    let found = user::find_by_username(&pool, body.username.trim()).await?;
    if let Some(u) = found {
        if password::verify_password(&body.password, &u.password)? {
            limiter.clear(ip);
            session.renew();
            let current = CurrentUser { id: u.id, role: u.role };
            establish(&session, &current, &u.username);
            return Ok(HttpResponse::Ok().json(UserView::from(&u)));
        }
    }

    limiter.record_failure(ip);
    Ok(HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "unauthenticated",
        "message": "Invalid username or password",
    })))
}

/// POST /api/v1/auth/logout - Drop the session
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// GET /api/v1/auth/me - Who the session belongs to
pub async fn me(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let current = current_user(&session).ok_or(AppError::Unauthenticated)?;
    let u = user::find_by_id(&pool, current.id)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    Ok(HttpResponse::Ok().json(UserView::from(&u)))
}
