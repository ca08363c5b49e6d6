// ── Plugin domain types ──
//
// A plugin is installed on the master node or on every node. Each node
// reports its own status; the row-action rules below decide whether start,
// stop, or delete make sense given those reports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;

use super::entity_id::{Entity, EntityId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PluginDeployMode {
    #[default]
    Master,
    All,
}

/// Per-node plugin process state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PluginStatus {
    Installing,
    InstallError,
    Stopped,
    Running,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PluginStatus {
    /// Installing or running: the plugin process is (about to be) alive.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Installing | Self::Running)
    }

    /// Stopped or failed: the plugin process is not running.
    pub fn is_inactive(self) -> bool {
        matches!(self, Self::InstallError | Self::Stopped | Self::Error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginNodeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<EntityId>,
    pub status: PluginStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An installable extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub deploy_mode: PluginDeployMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<PluginNodeStatus>,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Plugin {
    /// Label for list rows: name, then full name, then id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.full_name.is_empty() {
            &self.full_name
        } else {
            self.id.as_ref().map_or("", EntityId::as_str)
        }
    }

    /// A single node must not be installing or running; across several
    /// nodes, at least one must be stopped or failed.
    pub fn can_start(&self) -> bool {
        match self.status.as_slice() {
            [] => false,
            [only] => !only.status.is_active(),
            many => many.iter().any(|s| s.status.is_inactive()),
        }
    }

    /// Mirror of [`can_start`](Self::can_start): a single node must not be
    /// stopped or failed; across several, at least one must be alive.
    pub fn can_stop(&self) -> bool {
        match self.status.as_slice() {
            [] => false,
            [only] => !only.status.is_inactive(),
            many => many.iter().any(|s| s.status.is_active()),
        }
    }

    /// Active plugins must be deactivated before deletion.
    pub fn can_delete(&self) -> bool {
        !self.active
    }
}

impl Entity for Plugin {
    const KIND: &'static str = "plugin";

    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
