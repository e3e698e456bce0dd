//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod directory;
mod events;
mod repository;

pub use clock::Clock;
pub use directory::ClientDirectory;
pub use events::{EventError, PostEvent, PostEventSink};
pub use repository::PostRepository;
