// ── Task resource module ──
//
// The shared store plus two independently paginated sub-collections: the
// task's log lines and its schema-less result rows.

use std::sync::Arc;

use indexmap::IndexSet;
use strum::{AsRefStr, IntoStaticStr};
use tracing::debug;

use crawlab_api::{Query, Transport};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{EntityId, Pagination, ResultRow, Tab, Task, TaskStatus};
use crate::store::{Commit, Extension, Page, ResourceStore};

pub const ENDPOINT: &str = "/tasks";
/// Creating a task runs it.
pub const RUN_PATH: &str = "/tasks/run";

const LOGS_CHANNEL: &str = "logs";
const RESULTS_CHANNEL: &str = "results";

pub type TaskStore = ResourceStore<Task, TaskState>;

/// Build the task store.
pub fn store(transport: Arc<dyn Transport>, config: &ConsoleConfig) -> TaskStore {
    TaskStore::builder(transport, ENDPOINT)
        .new_form(Task::launch_form)
        .create_path(RUN_PATH)
        .detail_stats(true)
        .tabs([Tab::Overview, Tab::Logs, Tab::Data])
        .fencing(config.fencing)
        .table_pagination(Pagination::new(1, config.page_size))
        .build()
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TaskState {
    /// Lines of the current log page, newline-joined.
    pub log_content: String,
    pub log_pagination: Pagination,
    pub log_total: u64,
    /// Whether the view should keep polling logs. Nothing here polls.
    pub log_auto_update: bool,
    pub result_table_data: Vec<ResultRow>,
    pub result_table_pagination: Pagination,
    pub result_table_total: u64,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            log_content: String::new(),
            log_pagination: Pagination::LOG,
            log_total: 0,
            log_auto_update: false,
            result_table_data: Vec::new(),
            result_table_pagination: Pagination::TABLE,
            result_table_total: 0,
        }
    }
}

impl TaskState {
    /// Column names across the loaded result rows, in order of first
    /// appearance. Only the current page is considered.
    pub fn result_fields(&self) -> Vec<&str> {
        self.result_table_data
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, AsRefStr, IntoStaticStr)]
pub enum TaskMutation {
    SetLogContent(String),
    ResetLogContent,
    SetLogPagination(Pagination),
    ResetLogPagination,
    SetLogTotal(u64),
    ResetLogTotal,
    EnableLogAutoUpdate,
    DisableLogAutoUpdate,
    SetResultTableData(Vec<ResultRow>),
    ResetResultTableData,
    SetResultTablePagination(Pagination),
    ResetResultTablePagination,
    SetResultTableTotal(u64),
    ResetResultTableTotal,
}

impl Extension for TaskState {
    type Mutation = TaskMutation;

    fn apply(&mut self, mutation: TaskMutation) {
        match mutation {
            TaskMutation::SetLogContent(content) => self.log_content = content,
            TaskMutation::ResetLogContent => self.log_content = String::new(),
            TaskMutation::SetLogPagination(p) => self.log_pagination = p,
            TaskMutation::ResetLogPagination => self.log_pagination = Pagination::LOG,
            TaskMutation::SetLogTotal(total) => self.log_total = total,
            TaskMutation::ResetLogTotal => self.log_total = 0,
            TaskMutation::EnableLogAutoUpdate => self.log_auto_update = true,
            TaskMutation::DisableLogAutoUpdate => self.log_auto_update = false,
            TaskMutation::SetResultTableData(rows) => self.result_table_data = rows,
            TaskMutation::ResetResultTableData => self.result_table_data = Vec::new(),
            TaskMutation::SetResultTablePagination(p) => self.result_table_pagination = p,
            TaskMutation::ResetResultTablePagination => {
                self.result_table_pagination = Pagination::TABLE;
            }
            TaskMutation::SetResultTableTotal(total) => self.result_table_total = total,
            TaskMutation::ResetResultTableTotal => self.result_table_total = 0,
        }
    }
}

impl From<TaskMutation> for Commit<Task, TaskMutation> {
    fn from(m: TaskMutation) -> Self {
        Self::Ext(m)
    }
}

fn page_query(p: Pagination) -> Query {
    Query::new().with("page", p.page()).with("size", p.size())
}

// ── Actions ─────────────────────────────────────────────────────────

impl TaskStore {
    /// Fetch the log page described by `log_pagination`. The page replaces
    /// `log_content`; nothing accumulates.
    pub async fn get_logs(&self, id: &EntityId) -> Result<Page<String>, CoreError> {
        let query = self.read(|s| page_query(s.ext.log_pagination));
        let ticket = self.issue(LOGS_CHANNEL);

        let path = format!("{}/logs", self.item_path(id));
        let list = self.transport().get_list(&path, &query).await?;
        let lines = list
            .data
            .into_iter()
            .map(|line| serde_json::from_value(line).map_err(|e| CoreError::decode("log", &e)))
            .collect::<Result<Vec<String>, _>>()?;
        debug!(task = %id, lines = lines.len(), total = list.total, "logs fetched");

        self.commit_fenced(
            ticket,
            [
                TaskMutation::SetLogContent(lines.join("\n")).into(),
                TaskMutation::SetLogTotal(list.total).into(),
            ],
        );
        Ok(Page {
            data: lines,
            total: list.total,
        })
    }

    /// Fetch the result page described by `result_table_pagination`.
    pub async fn get_result_data(&self, id: &EntityId) -> Result<Page<ResultRow>, CoreError> {
        let query = self.read(|s| page_query(s.ext.result_table_pagination));
        let ticket = self.issue(RESULTS_CHANNEL);

        let path = format!("{}/data", self.item_path(id));
        let list = self.transport().get_list(&path, &query).await?;
        let rows = list
            .data
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| CoreError::decode("result", &e)))
            .collect::<Result<Vec<ResultRow>, _>>()?;
        debug!(task = %id, rows = rows.len(), total = list.total, "results fetched");

        self.commit_fenced(
            ticket,
            [
                TaskMutation::SetResultTableData(rows.clone()).into(),
                TaskMutation::SetResultTableTotal(list.total).into(),
            ],
        );
        Ok(Page {
            data: rows,
            total: list.total,
        })
    }

    /// Fetch the task into `form`. Once the task has reached a terminal
    /// status, log auto-update is switched off.
    pub async fn get_detail(&self, id: &EntityId) -> Result<Task, CoreError> {
        let task = self.get_by_id(id).await?;
        if task.status.is_some_and(TaskStatus::is_terminal) {
            debug!(task = %id, status = ?task.status, "task done, log auto-update off");
            self.commit(TaskMutation::DisableLogAutoUpdate);
        }
        Ok(task)
    }

    /// Owned copy of [`TaskState::result_fields`].
    pub fn result_fields(&self) -> Vec<String> {
        self.read(|s| s.ext.result_fields().into_iter().map(str::to_owned).collect())
    }

    /// Reset every log and result sub-state, e.g. when leaving the task.
    pub fn reset_detail(&self) {
        self.commit_all(
            [
                TaskMutation::ResetLogContent,
                TaskMutation::ResetLogPagination,
                TaskMutation::ResetLogTotal,
                TaskMutation::DisableLogAutoUpdate,
                TaskMutation::ResetResultTableData,
                TaskMutation::ResetResultTablePagination,
                TaskMutation::ResetResultTableTotal,
            ]
            .map(Commit::from),
        );
    }
}
