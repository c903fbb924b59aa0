use serde::{Deserialize, Serialize};

/// Body of `POST /push`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PushRequest {
    pub priority: i64,
    pub data: String,
}

/// Reply to a successful push.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub message_id: String,
}

/// Reply to a pull that found a message.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub message_id: String,
    pub data: String,
}
