//! Application state - shared across all handlers.

use std::sync::Arc;

use cadence_core::PostRegistry;
use cadence_core::ports::Clock;
use cadence_infra::{InMemoryClientDirectory, InMemoryEventBus, InMemoryPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: PostRegistry,
    pub clients: Arc<InMemoryClientDirectory>,
    pub events: Arc<InMemoryEventBus>,
}

impl AppState {
    /// Wire the registry to its in-memory adapters.
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let clients = Arc::new(InMemoryClientDirectory::new());
        let events = Arc::new(InMemoryEventBus::new(config.event_buffer_size));

        let registry = PostRegistry::new(
            Arc::new(InMemoryPostRepository::new()),
            clock,
            clients.clone(),
            events.clone(),
        )
        .with_calendar_offset(config.calendar_offset);

        tracing::info!(
            calendar_offset = %config.calendar_offset,
            "Application state initialized"
        );

        Self {
            registry,
            clients,
            events,
        }
    }
}
