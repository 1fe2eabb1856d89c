use std::sync::Arc;

use models::{NewPost, Post, PostPatch, PostPayload, SearchFilter, SortSpec};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::posts::repository::{InMemoryPostRepository, PostRepository};

pub type InMemoryPostService = PostService<InMemoryPostRepository>;

/// Application service encapsulating the post rules: field validation,
/// partial updates, ordering and search.
pub struct PostService<R: PostRepository> {
    repo: Arc<R>,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All posts, optionally reordered. Stored order is never touched.
    pub async fn list(
        &self,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Vec<Post>, ServiceError> {
        let spec = SortSpec::parse(sort, direction)?;
        let mut posts = self.repo.list().await?;
        if let Some(spec) = spec {
            spec.apply(&mut posts);
        }
        Ok(posts)
    }

    #[instrument(skip_all)]
    pub async fn create(&self, payload: &PostPayload) -> Result<Post, ServiceError> {
        let input = NewPost::from_payload(payload)?;
        let post = self.repo.create(input).await?;
        info!(id = post.id, "post_created");
        Ok(post)
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: u64, payload: &PostPayload) -> Result<Post, ServiceError> {
        let patch = PostPatch::from_payload(payload);
        if patch.is_empty() {
            debug!("update carries no usable fields");
        }
        self.repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::post_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        if self.repo.delete(id).await? {
            info!("post_deleted");
            Ok(())
        } else {
            Err(ServiceError::post_not_found(id))
        }
    }

    /// Posts whose fields contain every supplied substring, then optionally sorted.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Vec<Post>, ServiceError> {
        let spec = SortSpec::parse(sort, direction)?;
        let mut posts = self.repo.list().await?;
        if !filter.is_empty() {
            posts.retain(|p| filter.matches(p));
        }
        if let Some(spec) = spec {
            spec.apply(&mut posts);
        }
        Ok(posts)
    }

    pub async fn count(&self) -> Result<usize, ServiceError> {
        self.repo.count().await
    }
}
