use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Idea lifecycle states. `closed` is the terminal, purchasable state; the
/// progression is one-way (published → overdue → closed) outside explicit
/// admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Published,
    Overdue,
    Closed,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Published => "published",
            IdeaStatus::Overdue => "overdue",
            IdeaStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<IdeaStatus> {
        match s {
            "published" => Some(IdeaStatus::Published),
            "overdue" => Some(IdeaStatus::Overdue),
            "closed" => Some(IdeaStatus::Closed),
            _ => None,
        }
    }
}

/// Full idea record as persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Idea {
    pub id: i64,
    pub display_number: String,
    pub author_id: i64,
    pub title: String,
    pub summary: String,
    /// Long-form deliverable text; set at finalization, owner/admin eyes only
    /// until purchased.
    pub detail: Option<String>,
    pub attachments: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: IdeaStatus,
    pub base_price: Option<i64>,
    pub final_price: Option<i64>,
    pub is_exclusive: bool,
    pub purchase_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// True when the viewer may see the finalized deliverable text.
    pub fn detail_visible_to(&self, viewer_id: Option<i64>, viewer_is_admin: bool) -> bool {
        viewer_is_admin || viewer_id == Some(self.author_id)
    }
}

/// Body of POST /api/v1/ideas.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub is_exclusive: bool,
}

/// Owner edit of a published idea; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub attachments: Option<Vec<String>>,
}

/// Administrative override; no ownership check, may move status backward.
/// Exclusivity stays one-way even here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminIdeaPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<IdeaStatus>,
    pub base_price: Option<i64>,
    pub final_price: Option<i64>,
    pub is_exclusive: Option<bool>,
}

/// Idea as shown in list views; never carries the deliverable text.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaListItem {
    pub id: i64,
    pub display_number: String,
    pub author_id: i64,
    pub title: String,
    pub summary: String,
    pub deadline: Option<DateTime<Utc>>,
    pub status: IdeaStatus,
    pub final_price: Option<i64>,
    pub is_exclusive: bool,
    pub purchase_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Idea> for IdeaListItem {
    fn from(i: &Idea) -> Self {
        IdeaListItem {
            id: i.id,
            display_number: i.display_number.clone(),
            author_id: i.author_id,
            title: i.title.clone(),
            summary: i.summary.clone(),
            deadline: i.deadline,
            status: i.status,
            final_price: i.final_price,
            is_exclusive: i.is_exclusive,
            purchase_count: i.purchase_count,
            created_at: i.created_at,
        }
    }
}

/// Single-idea response body. `detail` is withheld from viewers other than
/// the owner and admins; `attachment_urls` is the resolved form of the
/// stored paths.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaView {
    pub id: i64,
    pub display_number: String,
    pub author_id: i64,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub attachments: Vec<String>,
    pub attachment_urls: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: IdeaStatus,
    pub base_price: Option<i64>,
    pub final_price: Option<i64>,
    pub is_exclusive: bool,
    pub purchase_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdeaView {
    pub fn build(idea: Idea, attachment_urls: Vec<String>, include_detail: bool) -> Self {
        IdeaView {
            id: idea.id,
            display_number: idea.display_number,
            author_id: idea.author_id,
            title: idea.title,
            summary: idea.summary,
            detail: if include_detail { idea.detail } else { None },
            attachments: idea.attachments,
            attachment_urls,
            deadline: idea.deadline,
            status: idea.status,
            base_price: idea.base_price,
            final_price: idea.final_price,
            is_exclusive: idea.is_exclusive,
            purchase_count: idea.purchase_count,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
        }
    }
}

/// An idea the deadline sweep moved to `overdue`, as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SweptIdea {
    pub id: i64,
    pub display_number: String,
    pub title: String,
    pub deadline: Option<DateTime<Utc>>,
    pub author_id: i64,
}
