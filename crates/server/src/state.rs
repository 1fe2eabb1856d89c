use std::sync::Arc;

use configs::StoreConfig;
use service::{InMemoryPostRepository, InMemoryPostService};

/// Shared handler state. Built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<InMemoryPostService>,
}

impl AppState {
    pub fn new(posts: InMemoryPostService) -> Self {
        Self { posts: Arc::new(posts) }
    }

    pub fn from_config(store: &StoreConfig) -> Self {
        let repo = if store.seed {
            InMemoryPostRepository::seeded(store.id_strategy)
        } else {
            InMemoryPostRepository::new(store.id_strategy)
        };
        Self::new(InMemoryPostService::new(Arc::new(repo)))
    }
}
