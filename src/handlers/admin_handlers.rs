use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::attachments::AttachmentResolver;
use crate::audit;
use crate::auth::session::require_admin;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::lifecycle;
use crate::models::idea::{self, AdminIdeaPatch, IdeaView};

/// POST /api/v1/admin/ideas/{id}/exclusive-contract - Grant an exclusive contract
pub async fn grant_exclusive(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session)?;
    let id = path.into_inner();
    let updated = lifecycle::grant_exclusive(&pool, id, &admin).await?;

    let details = serde_json::json!({
        "display_number": updated.display_number,
        "final_price": updated.final_price,
    });
    let _ = audit::log(&pool, admin.id, "idea.exclusive_granted", "idea", id, details).await;

    let urls = resolver.resolve_all(&updated.attachments);
    Ok(HttpResponse::Ok().json(IdeaView::build(updated, urls, true)))
}

/// PATCH /api/v1/admin/ideas/{id} - Administrative override of idea fields
///
/// Bypasses ownership and the forward-only status rule. Exclusivity still
/// cannot be revoked.
pub async fn update_idea(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<AdminIdeaPatch>,
    resolver: web::Data<AttachmentResolver>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session)?;
    let id = path.into_inner();
    let updated = idea::admin_update(&pool, id, &body).await?;

    let details = serde_json::json!({
        "display_number": updated.display_number,
        "status": updated.status,
        "final_price": updated.final_price,
        "is_exclusive": updated.is_exclusive,
    });
    let _ = audit::log(&pool, admin.id, "idea.admin_updated", "idea", id, details).await;

    let urls = resolver.resolve_all(&updated.attachments);
    Ok(HttpResponse::Ok().json(IdeaView::build(updated, urls, true)))
}

/// GET /api/v1/admin/audit - Recent audit entries
/// Query params: limit (default 50, cap 200)
pub async fn recent_audit(
    pool: web::Data<DbPool>,
    session: Session,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session)?;
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<i64>().ok())
        .unwrap_or(50)
        .clamp(1, 200);
    let entries = audit::find_recent(&pool, limit).await?;
    Ok(HttpResponse::Ok().json(entries))
}
