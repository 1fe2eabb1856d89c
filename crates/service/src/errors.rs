use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn post_not_found(id: impl Display) -> Self {
        Self::NotFound(format!("Post with id {id} not found."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(ServiceError::post_not_found(9999).to_string(), "Post with id 9999 not found.");
    }

    #[test]
    fn model_errors_keep_their_message() {
        let e: ServiceError = models::ModelError::MissingFields(vec!["content"]).into();
        assert_eq!(e.to_string(), "Missing required field(s): content");
    }
}
