// ── Git working-copy types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// One commit. The hash is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<GitRef>,
}

/// A pending change in the working copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitChange {
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub staging: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub worktree: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /spiders/{id}/git`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitData {
    #[serde(default)]
    pub current_branch: String,
    #[serde(default)]
    pub branches: Vec<GitRef>,
    #[serde(default)]
    pub logs: Vec<GitLog>,
    #[serde(default)]
    pub changes: Vec<GitChange>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
