use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder,
};

// Prometheus metrics (default registry)
pub static POSTS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_api_posts_created_total", "Total posts created")
        .expect("register posts_created_total")
});

pub static POSTS_UPDATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_api_posts_updated_total", "Total posts updated")
        .expect("register posts_updated_total")
});

pub static POSTS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_api_posts_deleted_total", "Total posts deleted")
        .expect("register posts_deleted_total")
});

pub static SEARCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_api_searches_total", "Total search requests served")
        .expect("register searches_total")
});

pub static VALIDATION_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_api_validation_errors_total",
        "Total requests rejected with 400"
    )
    .expect("register validation_errors_total")
});

pub static NOT_FOUND_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_api_not_found_total",
        "Total requests for unknown post ids"
    )
    .expect("register not_found_total")
});

pub static POSTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("blog_api_posts", "Posts currently stored")
        .expect("register posts gauge")
});

pub fn set_post_count(n: usize) {
    POSTS.set(i64::try_from(n).unwrap_or(i64::MAX));
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    // Touch every metric so the exposition lists them before first use.
    Lazy::force(&POSTS_CREATED_TOTAL);
    Lazy::force(&POSTS_UPDATED_TOTAL);
    Lazy::force(&POSTS_DELETED_TOTAL);
    Lazy::force(&SEARCHES_TOTAL);
    Lazy::force(&VALIDATION_ERRORS_TOTAL);
    Lazy::force(&NOT_FOUND_TOTAL);
    Lazy::force(&POSTS);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
