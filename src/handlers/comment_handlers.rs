use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::audit;
use crate::auth::session::require_user;
use crate::auth::validate;
use crate::content_filter::ContentFilter;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{comment, idea};
use crate::models::comment::NewComment;

const COMMENT_MAX: usize = 2000;

/// POST /api/v1/ideas/{id}/comments - Comment on a published idea
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<NewComment>,
    filter: web::Data<ContentFilter>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;

    if let Some(msg) = validate::validate_required(&body.body, "Comment", COMMENT_MAX) {
        return Err(AppError::Validation(msg));
    }
    if !filter.screen(&body.body) {
        return Err(AppError::Validation(
            "comment was rejected by content screening".to_string(),
        ));
    }

    let created = comment::create(&pool, path.into_inner(), user.id, body.body.trim()).await?;

    let details = serde_json::json!({ "idea_id": created.idea_id });
    let _ = audit::log(&pool, user.id, "comment.created", "comment", created.id, details).await;

    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/ideas/{id}/comments - Comments for one idea, oldest first
pub async fn list(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let idea_id = path.into_inner();
    if idea::find_by_id(&pool, idea_id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let comments = comment::find_by_idea(&pool, idea_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}
