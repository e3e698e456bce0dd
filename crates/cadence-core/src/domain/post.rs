use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContentType, Network, Operation, PostStatus};
use crate::error::DomainError;

/// Post entity - a unit of schedulable content owned by one client.
///
/// Fields are private: every change goes through a method that enforces the
/// lifecycle invariants (`published_at` set iff published, networks never
/// empty, comments append-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: Uuid,
    title: String,
    client_ref: String,
    content: String,
    content_type: ContentType,
    networks: BTreeSet<Network>,
    status: PostStatus,
    scheduled_for: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    comments: Vec<String>,
    urgent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

/// Fields supplied when drafting a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub client_ref: String,
    pub content: String,
    pub content_type: ContentType,
    pub networks: Vec<Network>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub urgent: bool,
}

/// Partial update of the mutable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub networks: Option<Vec<Network>>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.networks.is_none()
            && self.scheduled_for.is_none()
    }
}

fn network_set(networks: Vec<Network>) -> Result<BTreeSet<Network>, DomainError> {
    let set: BTreeSet<Network> = networks.into_iter().collect();
    if set.is_empty() {
        return Err(DomainError::validation("at least one network is required"));
    }
    Ok(set)
}

fn non_blank(value: &str, what: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

impl Post {
    /// Draft a new post with a generated id.
    pub fn new(draft: NewPost, now: DateTime<Utc>) -> Result<Self, DomainError> {
        non_blank(&draft.title, "title")?;
        non_blank(&draft.client_ref, "client reference")?;
        let networks = network_set(draft.networks)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title,
            client_ref: draft.client_ref,
            content: draft.content,
            content_type: draft.content_type,
            networks,
            status: PostStatus::Draft,
            scheduled_for: draft.scheduled_for,
            published_at: None,
            comments: Vec::new(),
            urgent: draft.urgent,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client_ref(&self) -> &str {
        &self.client_ref
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn networks(&self) -> &BTreeSet<Network> {
        &self.networks
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn scheduled_for(&self) -> Option<DateTime<Utc>> {
        self.scheduled_for
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Revision counter, advanced by the store on every committed write.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Copy of this post at the next revision. Only storage adapters call this.
    pub fn with_next_version(mut self) -> Self {
        self.version += 1;
        self
    }

    /// The instant a post occupies on the calendar: when it went out if
    /// published, otherwise when it is planned to.
    pub fn effective_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            PostStatus::Published => self.published_at,
            _ => self.scheduled_for,
        }
    }

    fn invalid(&self, operation: Operation) -> DomainError {
        DomainError::InvalidState {
            current: self.status,
            operation,
            target: operation.target(),
        }
    }

    fn guard_failed(&self, operation: Operation, reason: impl Into<String>) -> DomainError {
        DomainError::GuardFailed {
            current: self.status,
            operation,
            target: operation.target(),
            reason: reason.into(),
        }
    }

    /// Fails the guard of `operation` when `value` is blank.
    fn require_text(
        &self,
        value: &str,
        what: &str,
        operation: Operation,
    ) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(self.guard_failed(operation, format!("{what} must not be empty")));
        }
        Ok(())
    }

    fn enter(&mut self, op: Operation, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status = self.status.transition(op)?;
        self.updated_at = now;
        Ok(())
    }

    /// Apply a patch to the mutable fields.
    pub fn apply(&mut self, patch: PostPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(self.invalid(Operation::Update));
        }
        if patch.is_empty() {
            return Err(DomainError::validation("update must change at least one field"));
        }
        if let Some(title) = &patch.title {
            non_blank(title, "title")?;
        }
        let networks = patch.networks.map(network_set).transpose()?;
        if let Some(at) = patch.scheduled_for {
            if self.status == PostStatus::Scheduled && at <= now {
                return Err(self.guard_failed(
                    Operation::Update,
                    "a scheduled post can only be moved to a future time",
                ));
            }
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(networks) = networks {
            self.networks = networks;
        }
        if let Some(at) = patch.scheduled_for {
            self.scheduled_for = Some(at);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Append a reviewer note.
    pub fn add_comment(&mut self, text: String, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(self.invalid(Operation::Comment));
        }
        non_blank(&text, "comment")?;
        self.comments.push(text);
        self.updated_at = now;
        Ok(())
    }

    pub fn submit_for_approval(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.transition(Operation::SubmitForApproval)?;
        self.require_text(&self.content, "content", Operation::SubmitForApproval)?;
        if self.networks.is_empty() {
            return Err(self.guard_failed(
                Operation::SubmitForApproval,
                "at least one network is required",
            ));
        }
        self.enter(Operation::SubmitForApproval, now)
    }

    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.enter(Operation::Approve, now)
    }

    /// Reject with a reason, which is kept as a comment.
    pub fn reject(&mut self, reason: String, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.transition(Operation::Reject)?;
        self.require_text(&reason, "rejection reason", Operation::Reject)?;
        self.enter(Operation::Reject, now)?;
        self.comments.push(reason);
        Ok(())
    }

    /// Pin the post to a future instant.
    pub fn schedule(&mut self, at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.transition(Operation::Schedule)?;
        if at <= now {
            return Err(self.guard_failed(
                Operation::Schedule,
                format!("scheduled time {} is not in the future", at.to_rfc3339()),
            ));
        }
        self.enter(Operation::Schedule, now)?;
        self.scheduled_for = Some(at);
        Ok(())
    }

    /// Publish now. Returns `false` when the post was already published.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<bool, DomainError> {
        self.mark_published(now, now, Operation::Publish)
    }

    /// Record a publication reported by the external publisher.
    /// Returns `false` when the post was already published.
    pub fn confirm_published(
        &mut self,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.mark_published(at, now, Operation::MarkPublished)
    }

    fn mark_published(
        &mut self,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
        op: Operation,
    ) -> Result<bool, DomainError> {
        if self.status == PostStatus::Published {
            return Ok(false);
        }
        self.status.transition(op)?;
        let Some(scheduled_for) = self.scheduled_for else {
            return Err(DomainError::Internal(format!(
                "scheduled post {} has no scheduled time",
                self.id
            )));
        };
        if at < scheduled_for {
            return Err(self.guard_failed(
                op,
                format!(
                    "post is scheduled for {} and cannot be published at {}",
                    scheduled_for.to_rfc3339(),
                    at.to_rfc3339()
                ),
            ));
        }
        self.enter(op, now)?;
        self.published_at = Some(at);
        Ok(true)
    }

    /// Send a scheduled post back to `rejected` after the publisher failed.
    pub fn fail_publish(&mut self, reason: String, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.transition(Operation::MarkPublishFailed)?;
        self.require_text(&reason, "failure reason", Operation::MarkPublishFailed)?;
        self.enter(Operation::MarkPublishFailed, now)?;
        self.comments.push(format!("publish failed: {reason}"));
        Ok(())
    }
}
