use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Error payload returned by the listings API: `{ "message": ..., "detail"?: ... }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>, detail: Option<String>) -> Self {
        Self { message: message.into(), detail }
    }
}
