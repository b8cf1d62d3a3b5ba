use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub idea_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/v1/ideas/{id}/comments.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
}
