// ── Detail-page tabs ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Identifier of a resource detail tab. Presentation metadata only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tab {
    Overview,
    Files,
    Git,
    Tasks,
    Schedules,
    Data,
    Settings,
    Logs,
}

impl Tab {
    /// Title-cased label.
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Files => "Files",
            Self::Git => "Git",
            Self::Tasks => "Tasks",
            Self::Schedules => "Schedules",
            Self::Data => "Data",
            Self::Settings => "Settings",
            Self::Logs => "Logs",
        }
    }
}
