#![cfg(test)]
use std::sync::Arc;

use configs::IdStrategy;
use models::PostPayload;

use crate::posts::{repository::InMemoryPostRepository, service::InMemoryPostService};

/// Service over a fresh repository holding the two startup posts.
pub fn seeded_service() -> InMemoryPostService {
    InMemoryPostService::new(Arc::new(InMemoryPostRepository::seeded(IdStrategy::MaxPlusOne)))
}

pub fn payload(title: Option<&str>, content: Option<&str>) -> PostPayload {
    PostPayload { title: title.map(str::to_owned), content: content.map(str::to_owned) }
}
