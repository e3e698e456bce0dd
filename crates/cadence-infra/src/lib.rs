//! # Cadence Infrastructure
//!
//! Concrete implementations of the ports defined in `cadence-core`.
//! Everything here is in-process; nothing is persisted across restarts.

pub mod clock;
pub mod directory;
pub mod events;
pub mod store;

pub use clock::{ManualClock, SystemClock};
pub use directory::InMemoryClientDirectory;
pub use events::InMemoryEventBus;
pub use store::InMemoryPostRepository;
