use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a create or update request, exactly as the user wrote it.
///
/// Kept untyped so explicit `null`s and values of any JSON type reach GitHub
/// unchanged.
pub type IssuePayload = Map<String, Value>;

/// A GitHub issue as returned by the issues endpoints.
///
/// Only the fields this tool looks at are typed. Everything else the API
/// returns (labels, assignees, timestamps, urls, ...) lands in `extra`, in
/// server order, and is written back out unchanged, so a decoded issue
/// pretty-prints with all of its metadata. Typed fields print first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    /// A state this client does not know about, kept verbatim.
    #[serde(untagged)]
    Other(String),
}
