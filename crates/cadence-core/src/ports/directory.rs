use async_trait::async_trait;

/// Lookup into the external client directory.
///
/// The registry never owns client data; it only needs a display name per
/// client reference for text search.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Display name for a client reference, if the directory knows it.
    async fn display_name(&self, client_ref: &str) -> Option<String>;
}
