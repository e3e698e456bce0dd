use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;

/// Versioned post store.
///
/// Writes are compare-and-swap on [`Post::version`]: `update` succeeds only if
/// the stored revision still equals the revision the caller read.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Store a freshly created post at the end of the insertion order.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Replace a post whose stored version matches `post.version()`.
    /// Returns the committed copy at the next version.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Point-in-time snapshot of every post, in insertion order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;
}
