//! Post event port - change notifications for views and the publisher.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PostStatus;

/// Something that happened to a post after a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostEvent {
    Created {
        id: Uuid,
    },
    Updated {
        id: Uuid,
        version: u64,
    },
    Commented {
        id: Uuid,
        comment_count: usize,
    },
    StatusChanged {
        id: Uuid,
        from: PostStatus,
        to: PostStatus,
    },
    /// A scheduled post whose time has come; the external publisher acts on it.
    Due {
        id: Uuid,
        scheduled_for: DateTime<Utc>,
    },
}

impl PostEvent {
    pub fn post_id(&self) -> Uuid {
        match self {
            PostEvent::Created { id }
            | PostEvent::Updated { id, .. }
            | PostEvent::Commented { id, .. }
            | PostEvent::StatusChanged { id, .. }
            | PostEvent::Due { id, .. } => *id,
        }
    }

    /// Channel name the event is routed on.
    pub fn channel(&self) -> &'static str {
        match self {
            PostEvent::Due { .. } => "posts.due",
            _ => "posts.changes",
        }
    }
}

/// Sink for post events.
#[async_trait]
pub trait PostEventSink: Send + Sync {
    async fn publish(&self, event: PostEvent) -> Result<(), EventError>;
}

/// Event delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let id = Uuid::new_v4();
        let event = PostEvent::StatusChanged {
            id,
            from: PostStatus::Pending,
            to: PostStatus::Approved,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["to"], "approved");
        assert_eq!(event.channel(), "posts.changes");
        assert_eq!(event.post_id(), id);
    }
}
