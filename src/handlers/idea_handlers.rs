use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::attachments::{self, AttachmentResolver};
use crate::auth::session::{current_user, require_user};
use crate::auth::validate;
use crate::content_filter::ContentFilter;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::lifecycle::{self, FinalizeRequest};
use crate::models::idea::{self, Idea, IdeaPatch, IdeaView, NewIdea};
use crate::sweep::{self, SweepScope};
use crate::{audit, pricing};

fn idea_response(idea: Idea, resolver: &AttachmentResolver, include_detail: bool) -> IdeaView {
    let urls = resolver.resolve_all(&idea.attachments);
    IdeaView::build(idea, urls, include_detail)
}

/// POST /api/v1/ideas - Publish a new idea
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<NewIdea>,
    filter: web::Data<ContentFilter>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;

    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.title, "Title", validate::TITLE_MAX));
    errors.extend(validate::validate_required(&body.summary, "Summary", validate::SUMMARY_MAX));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }
    attachments::validate_paths(&body.attachments)?;
    if !filter.screen(&body.title) || !filter.screen(&body.summary) {
        return Err(AppError::Validation(
            "submission was rejected by content screening".to_string(),
        ));
    }

    let created = idea::create(&pool, user.id, &body, Utc::now()).await?;

    let details = serde_json::json!({
        "display_number": created.display_number,
        "title": created.title,
        "is_exclusive": created.is_exclusive,
    });
    let _ = audit::log(&pool, user.id, "idea.created", "idea", created.id, details).await;

    Ok(HttpResponse::Created().json(idea_response(created, &resolver, true)))
}

/// GET /api/v1/ideas - Public catalogue of published ideas
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let items = idea::find_published(&pool).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/ideas/mine - The caller's own ideas, swept first
///
/// The author-scoped sweep runs before the listing so the owner always sees
/// deadline transitions reflected, without waiting for the scheduler.
pub async fn list_mine(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;
    let outcome = sweep::run_sweep(&pool, SweepScope::Author(user.id), Utc::now()).await?;
    let items = idea::find_by_author(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": items,
        "swept": outcome.updated,
    })))
}

/// GET /api/v1/ideas/{id} - Single idea
///
/// The deliverable text stays hidden unless the viewer owns the idea or is
/// an admin.
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let idea = idea::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    let viewer = current_user(&session);
    let include_detail = idea.detail_visible_to(
        viewer.as_ref().map(|u| u.id),
        viewer.as_ref().is_some_and(|u| u.is_admin()),
    );
    Ok(HttpResponse::Ok().json(idea_response(idea, &resolver, include_detail)))
}

/// PATCH /api/v1/ideas/{id} - Owner edit of a published idea
pub async fn update(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<IdeaPatch>,
    filter: web::Data<ContentFilter>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;

    let mut errors = Vec::new();
    if let Some(title) = &body.title {
        errors.extend(validate::validate_required(title, "Title", validate::TITLE_MAX));
        if !filter.screen(title) {
            errors.push("Title was rejected by content screening".to_string());
        }
    }
    if let Some(summary) = &body.summary {
        errors.extend(validate::validate_required(summary, "Summary", validate::SUMMARY_MAX));
        if !filter.screen(summary) {
            errors.push("Summary was rejected by content screening".to_string());
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }
    if let Some(paths) = &body.attachments {
        attachments::validate_paths(paths)?;
    }

    let id = path.into_inner();
    let updated = idea::update(&pool, id, &body, &user).await?;

    let _ = audit::log(
        &pool,
        user.id,
        "idea.updated",
        "idea",
        id,
        serde_json::json!({ "display_number": updated.display_number }),
    )
    .await;

    Ok(HttpResponse::Ok().json(idea_response(updated, &resolver, true)))
}

/// DELETE /api/v1/ideas/{id} - Owner delete
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;
    let id = path.into_inner();
    idea::delete(&pool, id, &user).await?;

    let _ = audit::log(
        &pool,
        user.id,
        "idea.deleted",
        "idea",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/ideas/{id}/finalize - Close an overdue idea with pricing
pub async fn finalize(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<FinalizeRequest>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let user = require_user(&session)?;

    if let Some(msg) = validate::validate_required(&body.detail, "Detail", validate::DETAIL_MAX) {
        return Err(AppError::Validation(msg));
    }
    attachments::validate_paths(&body.attachments)?;

    let id = path.into_inner();
    let closed = lifecycle::finalize(&pool, id, &user, &body).await?;

    let details = serde_json::json!({
        "display_number": closed.display_number,
        "base_price": closed.base_price,
        "final_price": closed.final_price,
        "is_exclusive": closed.is_exclusive,
    });
    let _ = audit::log(&pool, user.id, "idea.finalized", "idea", id, details).await;

    Ok(HttpResponse::Ok().json(idea_response(closed, &resolver, true)))
}

/// GET /api/v1/pricing/options - Base price choices and floor
pub async fn pricing_options() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "base_price_choices": pricing::BASE_PRICE_CHOICES,
        "price_floor": pricing::PRICE_FLOOR,
    })))
}
