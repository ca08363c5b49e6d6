// ── Console registry ──
//
// Owns one store per resource, all sharing a single transport. Stores are
// created here and live as long as the console; nothing crosses between
// them.

use std::sync::Arc;

use tracing::debug;

use crawlab_api::{HttpTransport, Transport};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::list_view::PluginListView;
use crate::modules::{PluginStore, SpiderStore, TaskStore, plugin, spider, task};

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    spiders: Arc<SpiderStore>,
    tasks: Arc<TaskStore>,
    plugins: Arc<PluginStore>,
}

impl Console {
    /// Build a console talking HTTP to `config.url`.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.url.clone(), &config.transport())?;
        debug!(url = %config.url, fencing = ?config.fencing, "console created");
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Build a console over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ConsoleConfig) -> Self {
        let spiders = Arc::new(spider::store(Arc::clone(&transport), &config));
        let tasks = Arc::new(task::store(Arc::clone(&transport), &config));
        let plugins = Arc::new(plugin::store(transport, &config));

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                spiders,
                tasks,
                plugins,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn spiders(&self) -> &Arc<SpiderStore> {
        &self.inner.spiders
    }

    pub fn tasks(&self) -> &Arc<TaskStore> {
        &self.inner.tasks
    }

    pub fn plugins(&self) -> &Arc<PluginStore> {
        &self.inner.plugins
    }

    /// A list view over the plugin store.
    pub fn plugin_list(&self) -> PluginListView {
        PluginListView::new(Arc::clone(&self.inner.plugins))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RequestFencing;
    use crate::model::Pagination;

    #[test]
    fn stores_follow_config() {
        let config = ConsoleConfig {
            page_size: 25,
            fencing: RequestFencing::LatestIssued,
            ..ConsoleConfig::default()
        };
        let console = Console::new(config).unwrap();

        assert_eq!(console.spiders().endpoint(), "/spiders");
        assert_eq!(console.tasks().endpoint(), "/tasks");
        assert_eq!(console.plugins().endpoint(), "/plugins");
        assert_eq!(console.tasks().fencing(), RequestFencing::LatestIssued);
        assert_eq!(
            console.spiders().read(|s| s.base.table_pagination),
            Pagination::new(1, 25)
        );
    }

    #[test]
    fn task_form_defaults_to_launch_form() {
        let console = Console::new(ConsoleConfig::default()).unwrap();
        let form = console.tasks().read(|s| s.base.form.clone());
        assert_eq!(form, crate::model::Task::launch_form());
    }
}
