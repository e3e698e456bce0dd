//! Domain entities - the core business objects.

mod channel;
mod post;
mod status;

pub use channel::{ContentType, Network};
pub use post::{NewPost, Post, PostPatch};
pub use status::{Operation, PostStatus};
