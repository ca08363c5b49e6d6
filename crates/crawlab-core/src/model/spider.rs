// ── Spider domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity_id::{Entity, EntityId};
use super::task::TaskMode;

/// A crawler definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spider {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cmd: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub param: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TaskMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_name: Option<String>,
    /// Server fields this layer does not interpret (`stat`, `project_id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Spider {
    const KIND: &'static str = "spider";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

/// Body of `POST /spiders/{id}/run`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpiderRunOptions {
    pub mode: TaskMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}
