use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ModelError;

/// A stored blog post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

impl Post {
    /// Overwrite the fields the patch carries; the rest stay as they are.
    pub fn apply(&mut self, patch: &PostPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
    }
}

/// Posts present at startup.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post { id: 1, title: "First post".into(), content: "This is the first post.".into() },
        Post { id: 2, title: "Second post".into(), content: "This is the second post.".into() },
    ]
}

/// Raw request body for create/update, read leniently.
///
/// Only JSON strings count as present. Anything that is not a JSON object
/// (empty body, invalid JSON, arrays) yields an empty payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPayload {
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => Self::from_value(&v),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);
        Self { title: field("title"), content: field("content") }
    }
}

/// Trimmed value of a field, or `None` when it is absent or blank.
pub fn normalize_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// A validated, trimmed post awaiting an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn from_payload(payload: &PostPayload) -> Result<Self, ModelError> {
        let title = normalize_field(payload.title.as_deref());
        let content = normalize_field(payload.content.as_deref());
        match (title, content) {
            (Some(title), Some(content)) => Ok(Self { title, content }),
            (title, content) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if content.is_none() {
                    missing.push("content");
                }
                Err(ModelError::MissingFields(missing))
            }
        }
    }

    pub fn into_post(self, id: u64) -> Post {
        Post { id, title: self.title, content: self.content }
    }
}

/// Partial update. Blank fields were dropped while building it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn from_payload(payload: &PostPayload) -> Self {
        Self {
            title: normalize_field(payload.title.as_deref()),
            content: normalize_field(payload.content.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_ignores_non_string_fields() {
        let p = PostPayload::from_value(&json!({"title": 5, "content": "body"}));
        assert_eq!(p.title, None);
        assert_eq!(p.content.as_deref(), Some("body"));
    }

    #[test]
    fn malformed_body_is_empty_payload() {
        assert_eq!(PostPayload::from_slice(b"{not json"), PostPayload::default());
        assert_eq!(PostPayload::from_slice(b""), PostPayload::default());
        assert_eq!(PostPayload::from_slice(b"[1,2]"), PostPayload::default());
    }

    #[test]
    fn new_post_trims_fields() {
        let p = PostPayload { title: Some("  Hello ".into()), content: Some("\tWorld\n".into()) };
        let np = NewPost::from_payload(&p).unwrap();
        assert_eq!(np.title, "Hello");
        assert_eq!(np.content, "World");
    }

    #[test]
    fn new_post_lists_every_missing_field() {
        let err = NewPost::from_payload(&PostPayload::default()).unwrap_err();
        assert_eq!(err, ModelError::MissingFields(vec!["title", "content"]));
        assert_eq!(err.to_string(), "Missing required field(s): title, content");

        let blank_title = PostPayload { title: Some("   ".into()), content: Some("x".into()) };
        let err = NewPost::from_payload(&blank_title).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field(s): title");
    }

    #[test]
    fn patch_skips_blank_fields() {
        let payload = PostPayload { title: Some("  ".into()), content: Some(" new ".into()) };
        let patch = PostPatch::from_payload(&payload);
        assert_eq!(patch.title, None);
        assert_eq!(patch.content.as_deref(), Some("new"));

        let mut post = seed_posts().remove(0);
        post.apply(&patch);
        assert_eq!(post.title, "First post");
        assert_eq!(post.content, "new");
    }

    #[test]
    fn post_serializes_with_plain_field_names() {
        let v = serde_json::to_value(&seed_posts()[1]).unwrap();
        assert_eq!(v["id"], 2);
        assert_eq!(v["title"], "Second post");
        assert_eq!(v["content"], "This is the second post.");
    }
}
