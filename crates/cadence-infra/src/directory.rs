//! In-memory client directory.
//!
//! Stands in for the agency's client roster, which lives outside the registry.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cadence_core::ports::ClientDirectory;

/// Client reference to display name, held in memory.
#[derive(Default)]
pub struct InMemoryClientDirectory {
    names: RwLock<HashMap<String, String>>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or rename a client.
    pub async fn upsert(&self, client_ref: impl Into<String>, display_name: impl Into<String>) {
        let mut names = self.names.write().await;
        names.insert(client_ref.into(), display_name.into());
    }
}

impl<K, V> FromIterator<(K, V)> for InMemoryClientDirectory
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            names: RwLock::new(names),
        }
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn display_name(&self, client_ref: &str) -> Option<String> {
        self.names.read().await.get(client_ref).cloned()
    }
}
