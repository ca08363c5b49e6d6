// ── Generic resource store ──
//
// One store per resource: reactive state behind a `watch` channel, the
// shared CRUD action set, and a single `commit` entry point. Actions await
// the transport without holding any borrow of the state; every commit is a
// synchronous, atomic `send_modify`.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crawlab_api::{ListResponse, Query, RequestBody, Response, Transport};

use super::extension::{Commit, Extension, NoExtension};
use super::fence::{Fence, Ticket};
use super::state::{FormFactory, Mutation, ResourceState, StateDefaults};
use crate::config::RequestFencing;
use crate::error::CoreError;
use crate::model::{Entity, EntityId, Pagination, Tab};
use crate::stream::StateStream;

/// Fencing channel for table list fetches.
pub(crate) const TABLE_CHANNEL: &str = "table";

// ── Snapshot ────────────────────────────────────────────────────────

/// Full state of one store: the shared collection state plus its extension.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T, X> {
    pub base: ResourceState<T>,
    pub ext: X,
}

/// One decoded page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T: Entity> Page<T> {
    fn decode(list: ListResponse) -> Result<Self, CoreError> {
        Ok(Self {
            data: decode_rows(list.data)?,
            total: list.total,
        })
    }
}

pub(crate) fn decode_rows<T: Entity>(rows: Vec<Value>) -> Result<Vec<T>, CoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| CoreError::decode(T::KIND, &e)))
        .collect()
}

/// Decode a response payload; `null` yields the default value.
pub(crate) fn decode_data<D>(entity: &'static str, data: Value) -> Result<D, CoreError>
where
    D: DeserializeOwned + Default,
{
    if data.is_null() {
        return Ok(D::default());
    }
    serde_json::from_value(data).map_err(|e| CoreError::decode(entity, &e))
}

// ── Store ───────────────────────────────────────────────────────────

/// State container and action set for one remote resource collection.
pub struct ResourceStore<T: Entity, X: Extension = NoExtension> {
    transport: Arc<dyn Transport>,
    endpoint: String,
    create_path: Option<String>,
    detail_stats: bool,
    defaults: StateDefaults<T>,
    fence: Fence,
    state: watch::Sender<StoreState<T, X>>,
}

impl<T: Entity, X: Extension> ResourceStore<T, X> {
    pub fn builder(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
    ) -> ResourceStoreBuilder<T, X> {
        ResourceStoreBuilder::new(transport, endpoint.into())
    }

    /// Collection endpoint, e.g. `/spiders`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fencing(&self) -> RequestFencing {
        self.fence.policy()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub(crate) fn item_path(&self, id: &EntityId) -> String {
        format!("{}/{id}", self.endpoint)
    }

    // ── State access ─────────────────────────────────────────────────

    /// Apply one mutation atomically and notify subscribers.
    pub fn commit(&self, commit: impl Into<Commit<T, X::Mutation>>) {
        let commit = commit.into();
        trace!(store = T::KIND, mutation = commit.name(), "commit");
        self.state.send_modify(|state| Self::apply(state, commit, &self.defaults));
    }

    /// Apply `commits` in order as one change. Readers and subscribers see
    /// either none of them or all of them.
    pub fn commit_all<I>(&self, commits: I)
    where
        I: IntoIterator<Item = Commit<T, X::Mutation>>,
    {
        self.state.send_modify(|state| self.apply_all(state, commits));
    }

    /// Apply `commits` in one step, unless `ticket` has been superseded.
    ///
    /// Returns `false` (and leaves the state untouched) for a stale ticket.
    pub(crate) fn commit_fenced<I>(&self, ticket: Ticket, commits: I) -> bool
    where
        I: IntoIterator<Item = Commit<T, X::Mutation>>,
    {
        let committed = self.state.send_if_modified(|state| {
            if !self.fence.admits(ticket) {
                return false;
            }
            self.apply_all(state, commits);
            true
        });
        if !committed {
            debug!(store = T::KIND, ?ticket, "dropping superseded response");
        }
        committed
    }

    pub(crate) fn issue(&self, channel: &'static str) -> Ticket {
        self.fence.issue(channel)
    }

    fn apply_all<I>(&self, state: &mut StoreState<T, X>, commits: I)
    where
        I: IntoIterator<Item = Commit<T, X::Mutation>>,
    {
        for commit in commits {
            trace!(store = T::KIND, mutation = commit.name(), "commit");
            Self::apply(state, commit, &self.defaults);
        }
    }

    fn apply(state: &mut StoreState<T, X>, commit: Commit<T, X::Mutation>, defaults: &StateDefaults<T>) {
        match commit {
            Commit::Base(m) => state.base.apply(m, defaults),
            Commit::Ext(m) => state.ext.apply(m),
        }
    }

    /// Read the current state without cloning it.
    ///
    /// Holds a read lock for the duration of `f`; do not commit from inside.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState<T, X>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> StoreState<T, X> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> StateStream<T, X> {
        StateStream::new(self.state.subscribe())
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Fetch the page described by the current pagination, filter, and
    /// sort; replace `table_data` and `table_total` with the result.
    pub async fn get_list(&self) -> Result<Page<T>, CoreError> {
        let query = self.read(|s| s.base.list_query())?;
        let ticket = self.issue(TABLE_CHANNEL);

        let list = self.transport.get_list(&self.endpoint, &query).await?;
        let page = Page::decode(list)?;
        debug!(store = T::KIND, rows = page.data.len(), total = page.total, "table fetched");

        self.commit_fenced(
            ticket,
            [Mutation::SetTableData {
                data: page.data.clone(),
                total: page.total,
            }
            .into()],
        );
        Ok(page)
    }

    /// Fetch a page with caller-supplied parameters. State is untouched.
    pub async fn get_list_with_params(&self, query: &Query) -> Result<Page<T>, CoreError> {
        let list = self.transport.get_list(&self.endpoint, query).await?;
        Page::decode(list)
    }

    /// Fetch one entity into `form`.
    pub async fn get_by_id(&self, id: &EntityId) -> Result<T, CoreError> {
        let query = if self.detail_stats {
            Query::new().with("stats", true)
        } else {
            Query::new()
        };
        let resp = self.transport.get(&self.item_path(id), &query).await?;
        let entity: T =
            serde_json::from_value(resp.data).map_err(|e| CoreError::decode(T::KIND, &e))?;

        self.commit(Mutation::SetForm(entity.clone()));
        Ok(entity)
    }

    /// Create an entity. The table is not refreshed.
    pub async fn create(&self, form: &T) -> Result<Response, CoreError> {
        let path = self.create_path.as_deref().unwrap_or(&self.endpoint);
        let resp = self.transport.post(path, json_body(form)?, None).await?;
        debug!(store = T::KIND, "created");
        Ok(resp)
    }

    /// Replace an entity. The table is not refreshed.
    pub async fn update(&self, id: &EntityId, form: &T) -> Result<Response, CoreError> {
        let resp = self
            .transport
            .put(&self.item_path(id), json_body(form)?)
            .await?;
        debug!(store = T::KIND, %id, "updated");
        Ok(resp)
    }

    /// Delete an entity. The table is not refreshed.
    pub async fn delete_by_id(&self, id: &EntityId) -> Result<Response, CoreError> {
        let resp = self
            .transport
            .del(&self.item_path(id), &Query::new())
            .await?;
        debug!(store = T::KIND, %id, "deleted");
        Ok(resp)
    }

    /// Fetch every entity, unpaginated, into `all_list`.
    pub async fn get_all_list(&self) -> Result<Vec<T>, CoreError> {
        let list = self
            .transport
            .get_list(&self.endpoint, &Query::new().with("all", true))
            .await?;
        let all: Vec<T> = decode_rows(list.data)?;
        debug!(store = T::KIND, count = all.len(), "all list fetched");

        self.commit(Mutation::SetAllList(all.clone()));
        Ok(all)
    }
}

pub(crate) fn json_body(value: &impl Serialize) -> Result<RequestBody, CoreError> {
    RequestBody::json(value).map_err(|e| CoreError::encode(&e))
}

// ── Builder ─────────────────────────────────────────────────────────

/// Configures a [`ResourceStore`]. Everything but the endpoint is optional.
pub struct ResourceStoreBuilder<T: Entity, X: Extension> {
    transport: Arc<dyn Transport>,
    endpoint: String,
    new_form: Option<FormFactory<T>>,
    create_path: Option<String>,
    detail_stats: bool,
    tabs: Vec<Tab>,
    fencing: RequestFencing,
    table_pagination: Pagination,
    _ext: PhantomData<X>,
}

impl<T: Entity, X: Extension> ResourceStoreBuilder<T, X> {
    fn new(transport: Arc<dyn Transport>, endpoint: String) -> Self {
        Self {
            transport,
            endpoint,
            new_form: None,
            create_path: None,
            detail_stats: false,
            tabs: Vec::new(),
            fencing: RequestFencing::default(),
            table_pagination: Pagination::TABLE,
            _ext: PhantomData,
        }
    }

    /// Blank-form factory used at construction and by `ResetForm`.
    #[must_use]
    pub fn new_form(mut self, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.new_form = Some(Arc::new(factory));
        self
    }

    /// POST target for `create`, when it differs from the endpoint.
    #[must_use]
    pub fn create_path(mut self, path: impl Into<String>) -> Self {
        self.create_path = Some(path.into());
        self
    }

    /// Request `stats=true` on `get_by_id`.
    #[must_use]
    pub fn detail_stats(mut self, enabled: bool) -> Self {
        self.detail_stats = enabled;
        self
    }

    #[must_use]
    pub fn tabs(mut self, tabs: impl IntoIterator<Item = Tab>) -> Self {
        self.tabs = tabs.into_iter().collect();
        self
    }

    #[must_use]
    pub fn fencing(mut self, policy: RequestFencing) -> Self {
        self.fencing = policy;
        self
    }

    /// Initial table pagination, also the target of `ResetTablePagination`.
    #[must_use]
    pub fn table_pagination(mut self, pagination: Pagination) -> Self {
        self.table_pagination = pagination;
        self
    }

    pub fn build(self) -> ResourceStore<T, X> {
        let defaults = StateDefaults {
            new_form: self.new_form.unwrap_or_else(|| Arc::new(T::default)),
            table_pagination: self.table_pagination,
            tabs: self.tabs,
        };
        let initial = StoreState {
            base: ResourceState::new(&defaults),
            ext: X::default(),
        };
        let (state, _) = watch::channel(initial);

        ResourceStore {
            transport: self.transport,
            endpoint: self.endpoint,
            create_path: self.create_path,
            detail_stats: self.detail_stats,
            defaults,
            fence: Fence::new(self.fencing),
            state,
        }
    }
}
