//! Data Transfer Objects - request/response types for the API.
//!
//! Enumerated values (status, network, content type) travel as lowercase
//! strings and are validated by the server.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to draft a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub client_ref: String,
    #[serde(default)]
    pub content: String,
    pub content_type: String,
    pub networks: Vec<String>,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub urgent: bool,
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub networks: Option<Vec<String>>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub at: DateTime<Utc>,
}

/// Callback from the external publisher after a successful publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPublishedRequest {
    pub published_at: DateTime<Utc>,
}

/// Callback from the external publisher after a failed publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishFailedRequest {
    pub reason: String,
}

/// Query string of `GET /api/posts`. Every parameter is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListParams {
    /// A status name or `all`.
    pub status: Option<String>,
    /// A network name or `all`.
    pub network: Option<String>,
    /// Free-text search term.
    pub q: Option<String>,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// A post as seen by API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub client_ref: String,
    pub content: String,
    pub content_type: String,
    pub networks: Vec<String>,
    pub status: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub comments: Vec<String>,
    pub urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

/// Per-status counters for the job list filter chips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCountsResponse {
    pub all: usize,
    pub draft: usize,
    pub pending: usize,
    pub approved: usize,
    pub scheduled: usize,
    pub published: usize,
    pub rejected: usize,
}

/// The reviewer's queue with its summary counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalQueueResponse {
    pub pending: usize,
    pub urgent: usize,
    pub with_comments: usize,
    pub items: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCellResponse {
    pub date: Option<NaiveDate>,
    pub posts: Vec<PostResponse>,
}

/// A month grid, Sunday-first, 35 or 42 cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub cells: Vec<CalendarCellResponse>,
}
