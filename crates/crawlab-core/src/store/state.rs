// ── Resource collection state and its base mutations ──
//
// `ResourceState<T>` is the shape every resource store shares. It is only
// ever changed by applying a `Mutation<T>`; reads go through snapshots.

use std::fmt;
use std::sync::Arc;

use strum::{AsRefStr, IntoStaticStr};

use crawlab_api::Query;

use crate::error::CoreError;
use crate::model::{Entity, FilterCondition, Pagination, SortKey, Tab};

/// Produces a blank form for a resource.
pub type FormFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

// ── State ───────────────────────────────────────────────────────────

/// Collection state shared by every resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Entity being created or edited.
    pub form: T,
    /// Current page. Replaced wholesale on every list fetch.
    pub table_data: Vec<T>,
    /// Server-reported total across all pages.
    pub table_total: u64,
    pub table_pagination: Pagination,
    pub table_list_filter: Vec<FilterCondition>,
    /// Most significant key first.
    pub table_list_sort: Vec<SortKey>,
    /// Unpaginated snapshot, fetched separately from the table.
    pub all_list: Vec<T>,
    pub tabs: Vec<Tab>,
}

impl<T: Entity> ResourceState<T> {
    pub(crate) fn new(defaults: &StateDefaults<T>) -> Self {
        Self {
            form: (defaults.new_form)(),
            table_data: Vec::new(),
            table_total: 0,
            table_pagination: defaults.table_pagination,
            table_list_filter: Vec::new(),
            table_list_sort: Vec::new(),
            all_list: Vec::new(),
            tabs: defaults.tabs.clone(),
        }
    }

    // ── Getters ──────────────────────────────────────────────────────

    /// Whether the server holds rows past the current page.
    pub fn has_more_pages(&self) -> bool {
        self.table_pagination.has_more(self.table_total)
    }

    pub fn page_count(&self) -> u64 {
        self.table_pagination.page_count(self.table_total)
    }

    /// Look up a row of the current page by id.
    pub fn table_row(&self, id: &crate::model::EntityId) -> Option<&T> {
        self.table_data.iter().find(|row| row.id() == Some(id))
    }

    /// Filters currently applied to `key`.
    pub fn filters_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FilterCondition> {
        self.table_list_filter.iter().filter(move |c| c.key == key)
    }

    /// Query for a table fetch: `page`, `size`, `conditions`, `sort`, `stats`.
    pub fn list_query(&self) -> Result<Query, CoreError> {
        let conditions =
            serde_json::to_string(&self.table_list_filter).map_err(|e| CoreError::encode(&e))?;
        let sort =
            serde_json::to_string(&self.table_list_sort).map_err(|e| CoreError::encode(&e))?;

        Ok(Query::new()
            .with("page", self.table_pagination.page())
            .with("size", self.table_pagination.size())
            .with("conditions", conditions)
            .with("sort", sort)
            .with("stats", true))
    }
}

// ── Defaults ────────────────────────────────────────────────────────

/// Per-resource values that `Reset*` mutations return to.
pub struct StateDefaults<T> {
    pub(crate) new_form: FormFactory<T>,
    pub(crate) table_pagination: Pagination,
    pub(crate) tabs: Vec<Tab>,
}

impl<T: Default + 'static> Default for StateDefaults<T> {
    fn default() -> Self {
        Self {
            new_form: Arc::new(T::default),
            table_pagination: Pagination::TABLE,
            tabs: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for StateDefaults<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefaults")
            .field("table_pagination", &self.table_pagination)
            .field("tabs", &self.tabs)
            .finish_non_exhaustive()
    }
}

// ── Mutations ───────────────────────────────────────────────────────

/// Named, synchronous state changes shared by every resource.
#[derive(Debug, Clone, PartialEq, AsRefStr, IntoStaticStr)]
pub enum Mutation<T> {
    SetForm(T),
    ResetForm,
    /// Replace the page and the total together.
    SetTableData {
        data: Vec<T>,
        total: u64,
    },
    ResetTableData,
    SetTablePagination(Pagination),
    ResetTablePagination,
    SetTableListFilter(Vec<FilterCondition>),
    ResetTableListFilter,
    /// Replace every condition on `key` with `conditions`, appended last.
    SetTableListFilterByKey {
        key: String,
        conditions: Vec<FilterCondition>,
    },
    ResetTableListFilterByKey(String),
    SetTableListSort(Vec<SortKey>),
    ResetTableListSort,
    /// Replace the sort on `sort.key` in place, or append it.
    SetTableListSortByKey(SortKey),
    ResetTableListSortByKey(String),
    SetAllList(Vec<T>),
    ResetAllList,
}

impl<T: Entity> ResourceState<T> {
    pub(crate) fn apply(&mut self, mutation: Mutation<T>, defaults: &StateDefaults<T>) {
        match mutation {
            Mutation::SetForm(form) => self.form = form,
            Mutation::ResetForm => self.form = (defaults.new_form)(),
            Mutation::SetTableData { data, total } => {
                self.table_data = data;
                self.table_total = total;
            }
            Mutation::ResetTableData => {
                self.table_data = Vec::new();
                self.table_total = 0;
            }
            Mutation::SetTablePagination(p) => self.table_pagination = p,
            Mutation::ResetTablePagination => self.table_pagination = defaults.table_pagination,
            Mutation::SetTableListFilter(filter) => self.table_list_filter = filter,
            Mutation::ResetTableListFilter => self.table_list_filter = Vec::new(),
            Mutation::SetTableListFilterByKey { key, conditions } => {
                self.table_list_filter.retain(|c| c.key != key);
                self.table_list_filter.extend(conditions);
            }
            Mutation::ResetTableListFilterByKey(key) => {
                self.table_list_filter.retain(|c| c.key != key);
            }
            Mutation::SetTableListSort(sort) => self.table_list_sort = sort,
            Mutation::ResetTableListSort => self.table_list_sort = Vec::new(),
            Mutation::SetTableListSortByKey(sort) => {
                match self.table_list_sort.iter_mut().find(|s| s.key == sort.key) {
                    Some(existing) => *existing = sort,
                    None => self.table_list_sort.push(sort),
                }
            }
            Mutation::ResetTableListSortByKey(key) => {
                self.table_list_sort.retain(|s| s.key != key);
            }
            Mutation::SetAllList(all) => self.all_list = all,
            Mutation::ResetAllList => self.all_list = Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{FilterOp, Spider};

    fn spider(id: &str) -> Spider {
        Spider {
            id: Some(id.into()),
            ..Spider::default()
        }
    }

    fn fresh() -> (ResourceState<Spider>, StateDefaults<Spider>) {
        let defaults = StateDefaults::default();
        (ResourceState::new(&defaults), defaults)
    }

    #[test]
    fn set_table_data_replaces_not_merges() {
        let (mut state, d) = fresh();
        state.apply(
            Mutation::SetTableData {
                data: vec![spider("a"), spider("b"), spider("c")],
                total: 3,
            },
            &d,
        );
        state.apply(
            Mutation::SetTableData {
                data: vec![spider("d")],
                total: 1,
            },
            &d,
        );

        assert_eq!(state.table_data, vec![spider("d")]);
        assert_eq!(state.table_total, 1);
    }

    #[test]
    fn resets_are_idempotent() {
        let (mut state, d) = fresh();
        let pristine = state.clone();

        state.apply(Mutation::SetForm(spider("x")), &d);
        state.apply(Mutation::SetTablePagination(Pagination::new(4, 50)), &d);
        state.apply(Mutation::SetAllList(vec![spider("y")]), &d);

        for _ in 0..2 {
            state.apply(Mutation::ResetForm, &d);
            state.apply(Mutation::ResetTablePagination, &d);
            state.apply(Mutation::ResetAllList, &d);
            state.apply(Mutation::ResetTableData, &d);
        }

        assert_eq!(state, pristine);
    }

    #[test]
    fn reset_form_uses_factory() {
        let defaults = StateDefaults {
            new_form: Arc::new(|| Spider {
                name: "untitled".into(),
                ..Spider::default()
            }),
            ..StateDefaults::default()
        };
        let mut state = ResourceState::new(&defaults);
        state.apply(Mutation::SetForm(spider("x")), &defaults);
        state.apply(Mutation::ResetForm, &defaults);
        assert_eq!(state.form.name, "untitled");
        assert_eq!(state.form.id, None);
    }

    #[test]
    fn filter_by_key_replaces_only_that_key() {
        let (mut state, d) = fresh();
        state.apply(
            Mutation::SetTableListFilter(vec![
                FilterCondition::new("name", FilterOp::Contains, "a"),
                FilterCondition::new("status", FilterOp::Equal, "running"),
            ]),
            &d,
        );
        state.apply(
            Mutation::SetTableListFilterByKey {
                key: "name".into(),
                conditions: vec![FilterCondition::new("name", FilterOp::Regex, "^n")],
            },
            &d,
        );

        let keys: Vec<_> = state
            .table_list_filter
            .iter()
            .map(|c| (c.key.as_str(), &c.op))
            .collect();
        assert_eq!(
            keys,
            vec![("status", &FilterOp::Equal), ("name", &FilterOp::Regex)]
        );

        state.apply(Mutation::ResetTableListFilterByKey("status".into()), &d);
        assert_eq!(state.filters_for("status").count(), 0);
        assert_eq!(state.filters_for("name").count(), 1);
    }

    #[test]
    fn sort_by_key_keeps_significance() {
        let (mut state, d) = fresh();
        state.apply(
            Mutation::SetTableListSort(vec![SortKey::asc("name"), SortKey::desc("create_ts")]),
            &d,
        );
        state.apply(Mutation::SetTableListSortByKey(SortKey::desc("name")), &d);
        state.apply(Mutation::SetTableListSortByKey(SortKey::asc("priority")), &d);

        assert_eq!(
            state.table_list_sort,
            vec![
                SortKey::desc("name"),
                SortKey::desc("create_ts"),
                SortKey::asc("priority")
            ]
        );

        state.apply(Mutation::ResetTableListSortByKey("create_ts".into()), &d);
        assert_eq!(state.table_list_sort.len(), 2);
    }

    #[test]
    fn list_query_layout() {
        let (mut state, d) = fresh();
        state.apply(Mutation::SetTablePagination(Pagination::new(2, 20)), &d);
        state.apply(
            Mutation::SetTableListFilter(vec![FilterCondition::new("name", FilterOp::Contains, "x")]),
            &d,
        );

        let query = state.list_query().unwrap();
        let keys: Vec<_> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "size", "conditions", "sort", "stats"]);
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("size"), Some("20"));
        assert_eq!(
            query.get("conditions"),
            Some(r#"[{"key":"name","op":"c","value":"x"}]"#)
        );
        assert_eq!(query.get("sort"), Some("[]"));
        assert_eq!(query.get("stats"), Some("true"));
    }

    #[test]
    fn pagination_change_leaves_data_alone() {
        let (mut state, d) = fresh();
        state.apply(
            Mutation::SetTableData {
                data: vec![spider("a")],
                total: 25,
            },
            &d,
        );
        state.apply(Mutation::SetTablePagination(Pagination::new(3, 10)), &d);

        assert_eq!(state.table_data.len(), 1);
        assert!(!state.has_more_pages());
        assert_eq!(state.page_count(), 3);
    }

    #[test]
    fn mutation_names() {
        let m: Mutation<Spider> = Mutation::ResetTableListSort;
        assert_eq!(m.as_ref(), "ResetTableListSort");
    }
}
