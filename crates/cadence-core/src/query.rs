//! Read-only projections over a snapshot of the registry.
//!
//! Every function here is pure: it takes the posts it filters and never
//! touches storage. Calendar-day comparisons happen in an explicit UTC offset.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Network, Post, PostStatus};
use crate::error::DomainError;

/// Client reference to display name, resolved ahead of a search.
pub type ClientNames = HashMap<String, String>;

/// Status predicate, where `All` matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PostStatus),
}

impl StatusFilter {
    pub fn matches(self, post: &Post) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => post.status() == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

/// Calendar date of a post's effective instant in the given offset.
pub fn effective_date(post: &Post, offset: FixedOffset) -> Option<NaiveDate> {
    post.effective_at()
        .map(|at| at.with_timezone(&offset).date_naive())
}

fn matches_term(post: &Post, needle: &str, names: &ClientNames) -> bool {
    let client = names
        .get(post.client_ref())
        .map(String::as_str)
        .unwrap_or(post.client_ref());

    [post.title(), client, post.content()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Sort by effective instant; `sort_by_key` is stable so ties keep
/// insertion order.
fn sort_by_time(posts: &mut [Post]) {
    posts.sort_by_key(Post::effective_at);
}

/// Posts landing on `date`, earliest first.
pub fn by_date(posts: &[Post], date: NaiveDate, offset: FixedOffset) -> Vec<Post> {
    PostQuery {
        date: Some(date),
        ..Default::default()
    }
    .apply(posts.to_vec(), offset, &ClientNames::new())
}

pub fn by_status(posts: &[Post], filter: StatusFilter) -> Vec<Post> {
    posts.iter().filter(|p| filter.matches(p)).cloned().collect()
}

/// Posts targeting `network`; `None` matches all.
pub fn by_network(posts: &[Post], network: Option<Network>) -> Vec<Post> {
    posts
        .iter()
        .filter(|p| network.is_none_or(|n| p.networks().contains(&n)))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, client name and content.
pub fn search(posts: &[Post], term: &str, names: &ClientNames) -> Vec<Post> {
    PostQuery {
        term: Some(term.to_string()),
        ..Default::default()
    }
    .apply(posts.to_vec(), Utc.fix(), names)
}

/// Conjunction of optional predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub date: Option<NaiveDate>,
    pub status: StatusFilter,
    pub network: Option<Network>,
    pub term: Option<String>,
}

impl PostQuery {
    /// Keep the posts that satisfy every predicate. Results are ordered by
    /// time when a date is given, insertion order otherwise.
    pub fn apply(&self, mut posts: Vec<Post>, offset: FixedOffset, names: &ClientNames) -> Vec<Post> {
        let needle = self
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        posts.retain(|post| {
            self.status.matches(post)
                && self
                    .network
                    .is_none_or(|n| post.networks().contains(&n))
                && self
                    .date
                    .is_none_or(|d| effective_date(post, offset) == Some(d))
                && needle
                    .as_deref()
                    .is_none_or(|n| matches_term(post, n, names))
        });

        if self.date.is_some() {
            sort_by_time(&mut posts);
        }
        posts
    }
}

/// Number of posts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub all: usize,
    pub draft: usize,
    pub pending: usize,
    pub approved: usize,
    pub scheduled: usize,
    pub published: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn tally(posts: &[Post]) -> Self {
        let mut counts = Self::default();
        for post in posts {
            counts.all += 1;
            *counts.slot(post.status()) += 1;
        }
        counts
    }

    pub fn get(&self, status: PostStatus) -> usize {
        match status {
            PostStatus::Draft => self.draft,
            PostStatus::Pending => self.pending,
            PostStatus::Approved => self.approved,
            PostStatus::Scheduled => self.scheduled,
            PostStatus::Published => self.published,
            PostStatus::Rejected => self.rejected,
        }
    }

    fn slot(&mut self, status: PostStatus) -> &mut usize {
        match status {
            PostStatus::Draft => &mut self.draft,
            PostStatus::Pending => &mut self.pending,
            PostStatus::Approved => &mut self.approved,
            PostStatus::Scheduled => &mut self.scheduled,
            PostStatus::Published => &mut self.published,
            PostStatus::Rejected => &mut self.rejected,
        }
    }
}

/// Posts waiting for a reviewer, most pressing first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalQueue {
    pub items: Vec<Post>,
    pub urgent: usize,
    pub with_comments: usize,
}

impl ApprovalQueue {
    /// Pending posts ordered urgent first, then by planned time with
    /// unplanned posts last, then insertion order.
    pub fn build(posts: &[Post]) -> Self {
        let mut items = by_status(posts, StatusFilter::Only(PostStatus::Pending));
        items.sort_by_key(|p| (!p.is_urgent(), p.scheduled_for().is_none(), p.scheduled_for()));

        Self {
            urgent: items.iter().filter(|p| p.is_urgent()).count(),
            with_comments: items.iter().filter(|p| !p.comments().is_empty()).count(),
            items,
        }
    }

    pub fn pending(&self) -> usize {
        self.items.len()
    }
}

/// Scheduled posts whose time has elapsed at `now`, oldest first.
pub fn due_for_publishing(posts: &[Post], now: DateTime<Utc>) -> Vec<Post> {
    let mut due: Vec<Post> = posts
        .iter()
        .filter(|p| p.status() == PostStatus::Scheduled)
        .filter(|p| p.scheduled_for().is_some_and(|at| at <= now))
        .cloned()
        .collect();
    due.sort_by_key(Post::scheduled_for);
    due
}
