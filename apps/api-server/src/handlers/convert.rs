//! Mapping between wire DTOs and domain types.

use chrono::NaiveDate;

use cadence_core::calendar::CalendarMonth;
use cadence_core::domain::{NewPost, Network, Post, PostPatch};
use cadence_core::query::{ApprovalQueue, PostQuery, StatusCounts};
use cadence_shared::dto::{
    ApprovalQueueResponse, CalendarCellResponse, CalendarResponse, CreatePostRequest,
    PostListParams, PostResponse, StatusCountsResponse, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};

fn networks(raw: Vec<String>) -> AppResult<Vec<Network>> {
    raw.iter()
        .map(|n| n.parse::<Network>().map_err(AppError::from))
        .collect()
}

pub fn new_post(req: CreatePostRequest) -> AppResult<NewPost> {
    Ok(NewPost {
        content_type: req.content_type.parse()?,
        networks: networks(req.networks)?,
        title: req.title,
        client_ref: req.client_ref,
        content: req.content,
        scheduled_for: req.scheduled_for,
        urgent: req.urgent,
    })
}

pub fn patch(req: UpdatePostRequest) -> AppResult<PostPatch> {
    Ok(PostPatch {
        title: req.title,
        content: req.content,
        networks: req.networks.map(networks).transpose()?,
        scheduled_for: req.scheduled_for,
    })
}

/// `all` and absent values mean "no predicate".
pub fn query(params: PostListParams) -> AppResult<PostQuery> {
    let network = match params.network.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(n) if n.eq_ignore_ascii_case("all") => None,
        Some(n) => Some(n.parse::<Network>()?),
    };
    let date = params
        .date
        .as_deref()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date '{d}', expected YYYY-MM-DD")))
        })
        .transpose()?;

    Ok(PostQuery {
        date,
        status: params.status.as_deref().unwrap_or("all").parse()?,
        network,
        term: params.q,
    })
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id(),
        title: post.title().to_string(),
        client_ref: post.client_ref().to_string(),
        content: post.content().to_string(),
        content_type: post.content_type().to_string(),
        networks: post.networks().iter().map(ToString::to_string).collect(),
        status: post.status().to_string(),
        scheduled_for: post.scheduled_for(),
        published_at: post.published_at(),
        comments: post.comments().to_vec(),
        urgent: post.is_urgent(),
        created_at: post.created_at(),
        updated_at: post.updated_at(),
        version: post.version(),
    }
}

pub fn posts(posts: &[Post]) -> Vec<PostResponse> {
    posts.iter().map(post).collect()
}

pub fn counts(counts: StatusCounts) -> StatusCountsResponse {
    StatusCountsResponse {
        all: counts.all,
        draft: counts.draft,
        pending: counts.pending,
        approved: counts.approved,
        scheduled: counts.scheduled,
        published: counts.published,
        rejected: counts.rejected,
    }
}

pub fn approval_queue(queue: &ApprovalQueue) -> ApprovalQueueResponse {
    ApprovalQueueResponse {
        pending: queue.pending(),
        urgent: queue.urgent,
        with_comments: queue.with_comments,
        items: posts(&queue.items),
    }
}

pub fn calendar(grid: &CalendarMonth) -> CalendarResponse {
    CalendarResponse {
        year: grid.month.year(),
        month: grid.month.month(),
        previous: grid.month.previous().map(|m| m.to_string()),
        next: grid.month.next().map(|m| m.to_string()),
        cells: grid
            .cells
            .iter()
            .map(|cell| CalendarCellResponse {
                date: cell.date,
                posts: posts(&cell.posts),
            })
            .collect(),
    }
}
