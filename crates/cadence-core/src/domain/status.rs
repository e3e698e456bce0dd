//! Post lifecycle states and the transition table between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Pending,
    Approved,
    Scheduled,
    Published,
    Rejected,
}

impl PostStatus {
    pub const ALL: [PostStatus; 6] = [
        PostStatus::Draft,
        PostStatus::Pending,
        PostStatus::Approved,
        PostStatus::Scheduled,
        PostStatus::Published,
        PostStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Approved => "approved",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
            PostStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == PostStatus::Published
    }

    /// Resolve the status reached by applying `op`, or fail naming both ends.
    pub fn transition(self, op: Operation) -> Result<PostStatus, DomainError> {
        use Operation::*;
        use PostStatus::*;

        let next = match (self, op) {
            (Draft | Rejected, SubmitForApproval) => Pending,
            (Pending, Approve) => Approved,
            (Pending, Reject) => Rejected,
            (Approved, Schedule) => Scheduled,
            (Scheduled, Publish | MarkPublished) => Published,
            (Scheduled, MarkPublishFailed) => Rejected,
            _ => {
                return Err(DomainError::InvalidState {
                    current: self,
                    operation: op,
                    target: op.target(),
                });
            }
        };
        Ok(next)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown status '{s}'")))
    }
}

/// Every mutating operation a post can be subjected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Update,
    Comment,
    SubmitForApproval,
    Approve,
    Reject,
    Schedule,
    Publish,
    MarkPublished,
    MarkPublishFailed,
}

impl Operation {
    /// The status this operation moves a post into, if it is a transition.
    pub fn target(self) -> Option<PostStatus> {
        match self {
            Operation::Update | Operation::Comment => None,
            Operation::SubmitForApproval => Some(PostStatus::Pending),
            Operation::Approve => Some(PostStatus::Approved),
            Operation::Reject | Operation::MarkPublishFailed => Some(PostStatus::Rejected),
            Operation::Schedule => Some(PostStatus::Scheduled),
            Operation::Publish | Operation::MarkPublished => Some(PostStatus::Published),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Update => "update",
            Operation::Comment => "comment on",
            Operation::SubmitForApproval => "submit for approval",
            Operation::Approve => "approve",
            Operation::Reject => "reject",
            Operation::Schedule => "schedule",
            Operation::Publish => "publish",
            Operation::MarkPublished => "mark as published",
            Operation::MarkPublishFailed => "mark as failed",
        };
        f.write_str(verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut status = PostStatus::Draft;
        for op in [
            Operation::SubmitForApproval,
            Operation::Approve,
            Operation::Schedule,
            Operation::Publish,
        ] {
            status = status.transition(op).unwrap();
        }
        assert_eq!(status, PostStatus::Published);
    }

    #[test]
    fn test_rejected_can_be_resubmitted() {
        let next = PostStatus::Rejected
            .transition(Operation::SubmitForApproval)
            .unwrap();
        assert_eq!(next, PostStatus::Pending);
    }

    #[test]
    fn test_published_is_terminal() {
        for op in [
            Operation::SubmitForApproval,
            Operation::Approve,
            Operation::Reject,
            Operation::Schedule,
            Operation::MarkPublishFailed,
        ] {
            assert!(PostStatus::Published.transition(op).is_err());
        }
    }

    #[test]
    fn test_approve_from_draft_names_both_states() {
        let err = PostStatus::Draft.transition(Operation::Approve).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState {
                current: PostStatus::Draft,
                operation: Operation::Approve,
                target: Some(PostStatus::Approved),
            }
        );
        assert_eq!(err.to_string(), "Cannot approve a post in status draft");
    }
}
