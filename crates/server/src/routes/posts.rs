use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use models::{Post, PostPayload, SearchFilter};
use service::errors::ServiceError;
use tracing::{debug, info};

use crate::errors::JsonApiError;
use crate::observability;
use crate::openapi::ErrorResponse;
use crate::state::AppState;

/// Raw query pairs. A key given more than once keeps its first value.
type QueryPairs = Vec<(String, String)>;

fn first(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `title` or `content`
    pub sort: Option<String>,
    /// `asc` (default) or `desc`
    pub direction: Option<String>,
}

impl From<QueryPairs> for ListQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self { sort: first(&pairs, "sort"), direction: first(&pairs, "direction") }
    }
}

#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the content
    pub content: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl From<QueryPairs> for SearchQuery {
    fn from(pairs: QueryPairs) -> Self {
        Self {
            title: first(&pairs, "title"),
            content: first(&pairs, "content"),
            sort: first(&pairs, "sort"),
            direction: first(&pairs, "direction"),
        }
    }
}

/// Path ids that are not integers cannot name a post.
fn parse_id(raw: &str) -> Result<u64, JsonApiError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ServiceError::post_not_found(raw).into())
}

#[utoipa::path(
    get, path = "/api/posts", tag = "posts",
    params(ListQuery),
    responses(
        (status = 200, description = "All posts", body = [crate::openapi::PostDoc]),
        (status = 400, description = "Invalid sort or direction", body = ErrorResponse)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<Post>>, JsonApiError> {
    let q = ListQuery::from(pairs);
    let posts = state.posts.list(q.sort.as_deref(), q.direction.as_deref()).await?;
    debug!(count = posts.len(), sort = ?q.sort, direction = ?q.direction, "list posts");
    Ok(Json(posts))
}

#[utoipa::path(
    post, path = "/api/posts", tag = "posts",
    request_body = crate::openapi::CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PostDoc),
        (status = 400, description = "Missing required field(s)", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Post>), JsonApiError> {
    let body = body?;
    let payload = PostPayload::from_slice(&body);
    let post = state.posts.create(&payload).await?;
    observability::POSTS_CREATED_TOTAL.inc();
    observability::set_post_count(state.posts.count().await?);
    info!(id = post.id, "created post");
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    put, path = "/api/posts/{id}", tag = "posts",
    params(("id" = u64, Path, description = "Post id")),
    request_body = crate::openapi::UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PostDoc),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Post>, JsonApiError> {
    let id = parse_id(&id)?;
    let body = body?;
    let payload = PostPayload::from_slice(&body);
    let post = state.posts.update(id, &payload).await?;
    observability::POSTS_UPDATED_TOTAL.inc();
    info!(id = post.id, "updated post");
    Ok(Json(post))
}

#[utoipa::path(
    delete, path = "/api/posts/{id}", tag = "posts",
    params(("id" = u64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let id = parse_id(&id)?;
    state.posts.delete(id).await?;
    observability::POSTS_DELETED_TOTAL.inc();
    observability::set_post_count(state.posts.count().await?);
    info!(id, "deleted post");
    Ok(Json(MessageBody::new(format!("Post with id {id} has been deleted successfully."))))
}

#[utoipa::path(
    get, path = "/api/posts/search", tag = "posts",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = [crate::openapi::PostDoc]),
        (status = 400, description = "Invalid sort or direction", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<Vec<Post>>, JsonApiError> {
    let q = SearchQuery::from(pairs);
    let filter = SearchFilter::new(q.title.as_deref(), q.content.as_deref());
    let posts = state
        .posts
        .search(&filter, q.sort.as_deref(), q.direction.as_deref())
        .await?;
    observability::SEARCHES_TOTAL.inc();
    debug!(count = posts.len(), title = ?q.title, content = ?q.content, "search posts");
    Ok(Json(posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_id_is_not_found() {
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Post with id abc not found.");
        assert_eq!(parse_id("12").unwrap(), 12);
    }

    #[test]
    fn repeated_query_keys_keep_the_first_value() {
        let pairs = vec![
            ("title".to_string(), "first".to_string()),
            ("title".to_string(), "second".to_string()),
            ("sort".to_string(), "title".to_string()),
        ];
        let q = SearchQuery::from(pairs);
        assert_eq!(q.title.as_deref(), Some("first"));
        assert_eq!(q.content, None);
        assert_eq!(q.sort.as_deref(), Some("title"));
    }
}
