//! Service layer providing the post collection and its business rules.
//! - `posts::repository` owns the data behind a single lock.
//! - `posts::service` applies validation, sorting and search on top of it.
//! - Errors surface as [`errors::ServiceError`].

pub mod errors;
pub mod posts;
#[cfg(test)]
pub mod test_support;

pub use posts::repository::{InMemoryPostRepository, PostRepository};
pub use posts::service::{InMemoryPostService, PostService};
