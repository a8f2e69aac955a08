use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple message response, used by the root, health and delete endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "API is healthy!")]
    pub message: String,
    pub detail: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}
