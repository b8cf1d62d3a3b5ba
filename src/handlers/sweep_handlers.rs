use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::sweep::{run_sweep, SweepScope};

/// POST /api/v1/overdue/update - Run the global deadline sweep now
///
/// Unauthenticated; the sweep only applies transitions that are already due.
pub async fn update_overdue(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let outcome = run_sweep(&pool, SweepScope::Global, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
