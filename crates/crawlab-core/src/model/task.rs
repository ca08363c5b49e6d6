// ── Task domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::{Entity, EntityId};

/// How a task is dispatched across worker nodes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskMode {
    #[default]
    Random,
    AllNodes,
    SelectedNodes,
    SelectedNodeTags,
}

/// Execution state reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Finished,
    Error,
    Cancelled,
    Abnormal,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// `true` once the task can no longer produce logs or results.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Error | Self::Cancelled | Self::Abnormal
        )
    }
}

/// A crawl execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spider_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TaskMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cmd: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub param: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server fields this layer does not interpret (`stat`, `node_id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Blank form for launching a task: random node, priority 5.
    pub fn launch_form() -> Self {
        Self {
            mode: Some(TaskMode::Random),
            priority: Some(5),
            ..Self::default()
        }
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

/// One row of a task's scraped dataset. Keys vary between rows.
pub type ResultRow = Map<String, Value>;
