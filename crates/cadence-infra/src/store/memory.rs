//! In-memory versioned post store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cadence_core::domain::Post;
use cadence_core::error::RepoError;
use cadence_core::ports::PostRepository;

#[derive(Default)]
struct Slots {
    /// Posts in insertion order.
    posts: Vec<Post>,
    /// Post id to position in `posts`.
    index: HashMap<Uuid, usize>,
}

/// Post store backed by a vector behind an async RwLock.
///
/// Reads clone a snapshot under the read guard. Updates compare the caller's
/// version with the stored one under the write guard, so at most one of two
/// writers holding the same revision commits.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    slots: RwLock<Slots>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let slots = self.slots.read().await;
        Ok(slots.index.get(&id).map(|&i| slots.posts[i].clone()))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut slots = self.slots.write().await;
        if slots.index.contains_key(&post.id()) {
            return Err(RepoError::Duplicate(post.id()));
        }

        let position = slots.posts.len();
        slots.index.insert(post.id(), position);
        slots.posts.push(post.clone());
        tracing::debug!(post_id = %post.id(), position, "Post stored");
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut slots = self.slots.write().await;
        let position = *slots.index.get(&post.id()).ok_or(RepoError::NotFound)?;
        let stored = &mut slots.posts[position];

        if stored.version() != post.version() {
            return Err(RepoError::Conflict {
                expected: post.version(),
                actual: stored.version(),
            });
        }

        *stored = post.with_next_version();
        Ok(stored.clone())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.slots.read().await.posts.clone())
    }
}
