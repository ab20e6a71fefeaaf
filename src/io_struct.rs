use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound chat request: the conversation plus whatever generation
/// parameters the platform sends along. Unknown fields land in `other`
/// so they reach the completion API untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatReqInput {
    pub messages: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copilot_thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(flatten)]
    pub other: Value,
}

/// One message in the conversation. Role is an open string; the platform
/// sends `system`, `user` and `assistant`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copilot_references: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub other: Value,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Turn {
            role: "system".to_string(),
            content: content.into(),
            copilot_references: None,
            other: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Structured contextual attachment to a turn. The relay never looks inside
/// these; only the request logger renders them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Reference {
    pub id: String,
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(flatten)]
    pub payload: ReferencePayload,
}

/// Payload shapes keyed by the `type` discriminator, with the body under
/// `data`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ReferencePayload {
    Repository(RepositoryRef),
    File(FileRef),
    Selection(SelectionRef),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRef {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
}

/// The identity API's view of the caller. Lives for one request only.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub login: String,
}
