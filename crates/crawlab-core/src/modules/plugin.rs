// ── Plugin resource module ──

use std::sync::Arc;

use tracing::debug;

use crawlab_api::{RequestBody, Response, Transport};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{EntityId, Pagination, Plugin, Tab};
use crate::store::ResourceStore;

pub const ENDPOINT: &str = "/plugins";

pub type PluginStore = ResourceStore<Plugin>;

/// Build the plugin store.
pub fn store(transport: Arc<dyn Transport>, config: &ConsoleConfig) -> PluginStore {
    PluginStore::builder(transport, ENDPOINT)
        .tabs([Tab::Overview])
        .fencing(config.fencing)
        .table_pagination(Pagination::new(1, config.page_size))
        .build()
}

impl PluginStore {
    /// Start the plugin process on its nodes.
    pub async fn start_by_id(&self, id: &EntityId) -> Result<Response, CoreError> {
        let path = format!("{}/start", self.item_path(id));
        let resp = self.transport().post(&path, RequestBody::Empty, None).await?;
        debug!(plugin = %id, "start requested");
        Ok(resp)
    }

    /// Stop the plugin process on its nodes.
    pub async fn stop_by_id(&self, id: &EntityId) -> Result<Response, CoreError> {
        let path = format!("{}/stop", self.item_path(id));
        let resp = self.transport().post(&path, RequestBody::Empty, None).await?;
        debug!(plugin = %id, "stop requested");
        Ok(resp)
    }
}
