//! Post record, request payloads and the validation rules shared by the
//! service and server crates.

pub mod errors;
pub mod post;
pub mod query;

pub use errors::ModelError;
pub use post::{NewPost, Post, PostPatch, PostPayload};
pub use query::{SearchFilter, SortDirection, SortField, SortSpec};
