use async_trait::async_trait;
use configs::IdStrategy;
use models::{NewPost, Post, PostPatch};
use tokio::sync::RwLock;

use crate::errors::ServiceError;

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts in insertion order.
    async fn list(&self) -> Result<Vec<Post>, ServiceError>;
    /// Assign the next id and append.
    async fn create(&self, input: NewPost) -> Result<Post, ServiceError>;
    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Option<Post>, ServiceError>;
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
    async fn count(&self) -> Result<usize, ServiceError>;
}

struct PostTable {
    posts: Vec<Post>,
    strategy: IdStrategy,
    /// Highest id ever issued; only consulted by `IdStrategy::Monotonic`.
    high_water: u64,
}

impl PostTable {
    fn max_id(&self) -> u64 {
        self.posts.iter().map(|p| p.id).max().unwrap_or(0)
    }

    fn next_id(&mut self) -> u64 {
        let id = match self.strategy {
            IdStrategy::MaxPlusOne => self.max_id() + 1,
            IdStrategy::Monotonic => self.high_water.max(self.max_id()) + 1,
        };
        self.high_water = self.high_water.max(id);
        id
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }
}

/// Vec-backed repository. Every mutation runs under the write lock, so id
/// assignment and append happen as one step.
pub struct InMemoryPostRepository {
    inner: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_posts(Vec::new(), strategy)
    }

    pub fn with_posts(posts: Vec<Post>, strategy: IdStrategy) -> Self {
        let high_water = posts.iter().map(|p| p.id).max().unwrap_or(0);
        Self { inner: RwLock::new(PostTable { posts, strategy, high_water }) }
    }

    /// Repository holding the two startup posts.
    pub fn seeded(strategy: IdStrategy) -> Self {
        Self::with_posts(models::post::seed_posts(), strategy)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, ServiceError> {
        Ok(self.inner.read().await.posts.clone())
    }

    async fn create(&self, input: NewPost) -> Result<Post, ServiceError> {
        let mut table = self.inner.write().await;
        let post = input.into_post(table.next_id());
        table.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Option<Post>, ServiceError> {
        let mut table = self.inner.write().await;
        let Some(idx) = table.position(id) else { return Ok(None) };
        let post = &mut table.posts[idx];
        post.apply(patch);
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let mut table = self.inner.write().await;
        match table.position(id) {
            Some(idx) => {
                table.posts.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.inner.read().await.posts.len())
    }
}
