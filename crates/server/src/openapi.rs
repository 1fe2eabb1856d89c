use utoipa::OpenApi;
use utoipa::ToSchema;

/// Path the generated document is served at.
pub const OPENAPI_JSON_PATH: &str = "/static/masterblog.json";
pub const SWAGGER_UI_PATH: &str = "/api/docs";

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct PostDoc {
    pub id: u64,
    pub title: String,
    pub content: String,
}

#[derive(ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Masterblog API", description = "In-memory blog post store"),
    paths(
        crate::routes::health,
        crate::routes::posts::list,
        crate::routes::posts::create,
        crate::routes::posts::update,
        crate::routes::posts::delete,
        crate::routes::posts::search,
    ),
    components(
        schemas(
            HealthResponse,
            PostDoc,
            CreatePostRequest,
            UpdatePostRequest,
            ErrorResponse,
            MessageResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "posts")
    )
)]
pub struct ApiDoc;
