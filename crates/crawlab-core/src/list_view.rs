// ── List-view controller ──
//
// Binds a store to a tabular view: filter, sort, and pagination changes are
// committed and followed by a fresh `get_list`; row actions run their CRUD
// action and then resynchronize. The store never pushes row-level updates.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Entity, EntityId, FilterCondition, Pagination, Plugin, SortKey};
use crate::modules::PluginStore;
use crate::store::{Extension, Mutation, NoExtension, Page, ResourceStore};

// ── Columns ─────────────────────────────────────────────────────────

/// Column metadata. Labels are display text supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub key: String,
    pub label: String,
    pub has_sort: bool,
    pub has_filter: bool,
    pub allow_filter_search: bool,
}

impl TableColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            has_sort: false,
            has_filter: false,
            allow_filter_search: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.has_sort = true;
        self
    }

    /// Enable filtering; `search` also allows free-text filter search.
    pub fn filterable(mut self, search: bool) -> Self {
        self.has_filter = true;
        self.allow_filter_search = search;
        self
    }
}

// ── ListView ────────────────────────────────────────────────────────

pub struct ListView<T: Entity, X: Extension = NoExtension> {
    store: Arc<ResourceStore<T, X>>,
    columns: Vec<TableColumn>,
    selection: Vec<EntityId>,
    refreshes_all_list: bool,
}

impl<T: Entity, X: Extension> ListView<T, X> {
    pub fn new(store: Arc<ResourceStore<T, X>>, columns: Vec<TableColumn>) -> Self {
        Self {
            store,
            columns,
            selection: Vec::new(),
            refreshes_all_list: false,
        }
    }

    /// Also refresh `all_list` after row actions, for views whose resource
    /// feeds selectors elsewhere.
    pub fn global(mut self) -> Self {
        self.refreshes_all_list = true;
        self
    }

    pub fn store(&self) -> &Arc<ResourceStore<T, X>> {
        &self.store
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn refreshes_all_list(&self) -> bool {
        self.refreshes_all_list
    }

    // ── Rendering inputs ─────────────────────────────────────────────

    /// Current rows and server total.
    pub fn rows(&self) -> Page<T> {
        self.store.read(|s| Page {
            data: s.base.table_data.clone(),
            total: s.base.table_total,
        })
    }

    pub fn pagination(&self) -> Pagination {
        self.store.read(|s| s.base.table_pagination)
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selection(&self) -> &[EntityId] {
        &self.selection
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.selection = ids.into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    pub async fn mount(&self) -> Result<Page<T>, CoreError> {
        self.store.get_list().await
    }

    /// Return table query state to its defaults.
    pub fn unmount(&mut self) {
        self.selection.clear();
        self.store.commit(Mutation::ResetTableListFilter);
        self.store.commit(Mutation::ResetTableListSort);
        self.store.commit(Mutation::ResetTablePagination);
        self.store.commit(Mutation::ResetTableData);
    }

    // ── Query changes ────────────────────────────────────────────────

    pub async fn set_filter(&self, filter: Vec<FilterCondition>) -> Result<Page<T>, CoreError> {
        self.store.commit(Mutation::SetTableListFilter(filter));
        self.store.get_list().await
    }

    pub async fn set_filter_by_key(
        &self,
        key: impl Into<String>,
        conditions: Vec<FilterCondition>,
    ) -> Result<Page<T>, CoreError> {
        let key = key.into();
        let mutation = if conditions.is_empty() {
            Mutation::ResetTableListFilterByKey(key)
        } else {
            Mutation::SetTableListFilterByKey { key, conditions }
        };
        self.store.commit(mutation);
        self.store.get_list().await
    }

    pub async fn set_sort(&self, sort: Vec<SortKey>) -> Result<Page<T>, CoreError> {
        self.store.commit(Mutation::SetTableListSort(sort));
        self.store.get_list().await
    }

    pub async fn set_sort_by_key(&self, sort: SortKey) -> Result<Page<T>, CoreError> {
        self.store.commit(Mutation::SetTableListSortByKey(sort));
        self.store.get_list().await
    }

    pub async fn set_pagination(&self, pagination: Pagination) -> Result<Page<T>, CoreError> {
        self.store.commit(Mutation::SetTablePagination(pagination));
        self.store.get_list().await
    }

    // ── Row actions ──────────────────────────────────────────────────

    /// Delete one row, then resynchronize.
    pub async fn delete_row(&self, id: &EntityId) -> Result<(), CoreError> {
        self.store.delete_by_id(id).await?;
        self.resync().await
    }

    /// Delete every selected row in order, then resynchronize once.
    ///
    /// Each id leaves the selection as soon as its delete succeeds. On
    /// failure the table is resynchronized if any row went, and the selection holds
    /// the failed id and everything after it.
    pub async fn delete_selected(&mut self) -> Result<(), CoreError> {
        let mut deleted = 0_usize;
        while let Some(id) = self.selection.first().cloned() {
            if let Err(err) = self.store.delete_by_id(&id).await {
                debug!(store = T::KIND, deleted, failed = %id, "selection delete stopped");
                if deleted > 0 {
                    if let Err(resync) = self.resync().await {
                        warn!(store = T::KIND, error = %resync, "resync after partial delete failed");
                    }
                }
                return Err(err);
            }
            self.selection.remove(0);
            deleted += 1;
        }
        debug!(store = T::KIND, count = deleted, "deleted selection");
        self.resync().await
    }

    /// Re-fetch the table, and `all_list` for global views, concurrently.
    pub async fn resync(&self) -> Result<(), CoreError> {
        if self.refreshes_all_list {
            tokio::try_join!(self.store.get_list(), self.store.get_all_list())?;
        } else {
            self.store.get_list().await?;
        }
        Ok(())
    }
}

// ── Plugin list ─────────────────────────────────────────────────────

/// Plugin table with start/stop/delete row actions gated by
/// [`Plugin::can_start`], [`Plugin::can_stop`], and [`Plugin::can_delete`].
pub struct PluginListView {
    inner: ListView<Plugin>,
}

impl PluginListView {
    pub fn new(store: Arc<PluginStore>) -> Self {
        let columns = vec![
            TableColumn::new("name", "Name").sortable().filterable(true),
            TableColumn::new("status", "Status"),
            TableColumn::new("pid", "Process ID"),
            TableColumn::new("description", "Description").filterable(true),
        ];
        Self {
            inner: ListView::new(store, columns).global(),
        }
    }

    pub fn view(&self) -> &ListView<Plugin> {
        &self.inner
    }

    pub fn view_mut(&mut self) -> &mut ListView<Plugin> {
        &mut self.inner
    }

    fn row(&self, id: &EntityId) -> Result<Plugin, CoreError> {
        self.inner
            .store
            .read(|s| s.base.table_row(id).cloned())
            .ok_or_else(|| CoreError::Rejected {
                message: format!("plugin {id} is not on the current page"),
            })
    }

    fn check(id: &EntityId, allowed: bool, action: &str) -> Result<(), CoreError> {
        if allowed {
            Ok(())
        } else {
            Err(CoreError::Rejected {
                message: format!("cannot {action} plugin {id} in its current state"),
            })
        }
    }

    pub async fn start(&self, id: &EntityId) -> Result<(), CoreError> {
        Self::check(id, self.row(id)?.can_start(), "start")?;
        self.inner.store.start_by_id(id).await?;
        self.inner.store.get_list().await?;
        Ok(())
    }

    pub async fn stop(&self, id: &EntityId) -> Result<(), CoreError> {
        Self::check(id, self.row(id)?.can_stop(), "stop")?;
        self.inner.store.stop_by_id(id).await?;
        self.inner.store.get_list().await?;
        Ok(())
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        Self::check(id, self.row(id)?.can_delete(), "delete")?;
        self.inner.delete_row(id).await
    }
}
