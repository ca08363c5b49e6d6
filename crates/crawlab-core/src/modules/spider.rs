// ── Spider resource module ──
//
// The shared store plus two sub-states: file-tree navigation with an open
// file buffer, and the spider's git working copy.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;
use strum::{AsRefStr, IntoStaticStr};
use tracing::debug;

use crawlab_api::{MultipartForm, Query, RequestBody, Response, Transport};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::{
    EntityId, FileNavItem, FileUpload, GitChange, GitData, GitLog, Pagination, Spider,
    SpiderRunOptions, Tab,
};
use crate::store::{Commit, Extension, ResourceStore, decode_data, json_body};

pub const ENDPOINT: &str = "/spiders";

pub type SpiderStore = ResourceStore<Spider, SpiderState>;

/// Build the spider store.
pub fn store(transport: Arc<dyn Transport>, config: &ConsoleConfig) -> SpiderStore {
    SpiderStore::builder(transport, ENDPOINT)
        .tabs([
            Tab::Overview,
            Tab::Files,
            Tab::Git,
            Tab::Tasks,
            Tab::Schedules,
            Tab::Data,
            Tab::Settings,
        ])
        .fencing(config.fencing)
        .table_pagination(Pagination::new(1, config.page_size))
        .build()
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiderState {
    /// Listing of the last directory fetched.
    pub file_nav_items: Vec<FileNavItem>,
    /// Selected node, if any.
    pub active_nav_item: Option<FileNavItem>,
    /// Text buffer of the open file.
    pub file_content: String,
    pub default_file_paths: Vec<String>,
    pub current_git_branch: String,
    pub git_data: GitData,
    /// Pending changes picked for the next commit.
    pub git_change_selection: Vec<GitChange>,
}

/// Where the file editor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNavState<'a> {
    /// No file open. `path` is the selected directory, if any.
    Browsing { path: Option<&'a str> },
    /// A file is selected and its buffer is `content`.
    Editing { path: &'a str, content: &'a str },
}

impl SpiderState {
    /// Hash → log lookup over `git_data.logs`. Logs without a hash are
    /// skipped; a repeated hash maps to its last occurrence.
    pub fn git_logs_map(&self) -> IndexMap<&str, &GitLog> {
        let mut map = IndexMap::new();
        for log in &self.git_data.logs {
            if let Some(hash) = log.hash.as_deref() {
                map.insert(hash, log);
            }
        }
        map
    }

    pub fn file_nav_state(&self) -> FileNavState<'_> {
        match &self.active_nav_item {
            Some(item) if item.is_file() => FileNavState::Editing {
                path: &item.path,
                content: &self.file_content,
            },
            Some(dir) => FileNavState::Browsing {
                path: Some(&dir.path),
            },
            None => FileNavState::Browsing { path: None },
        }
    }

    /// Paths of the selected git changes, in selection order.
    pub fn selected_paths(&self) -> Vec<String> {
        self.git_change_selection
            .iter()
            .map(|c| c.path.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, AsRefStr, IntoStaticStr)]
pub enum SpiderMutation {
    SetFileNavItems(Vec<FileNavItem>),
    ResetFileNavItems,
    SetActiveFileNavItem(FileNavItem),
    ResetActiveFileNavItem,
    SetFileContent(String),
    ResetFileContent,
    SetDefaultFilePaths(Vec<String>),
    ResetDefaultFilePaths,
    SetCurrentGitBranch(String),
    ResetCurrentGitBranch,
    SetGitData(GitData),
    ResetGitData,
    SetGitChangeSelection(Vec<GitChange>),
    ResetGitChangeSelection,
}

impl Extension for SpiderState {
    type Mutation = SpiderMutation;

    fn apply(&mut self, mutation: SpiderMutation) {
        match mutation {
            SpiderMutation::SetFileNavItems(items) => self.file_nav_items = items,
            SpiderMutation::ResetFileNavItems => self.file_nav_items = Vec::new(),
            SpiderMutation::SetActiveFileNavItem(item) => self.active_nav_item = Some(item),
            SpiderMutation::ResetActiveFileNavItem => self.active_nav_item = None,
            SpiderMutation::SetFileContent(content) => self.file_content = content,
            SpiderMutation::ResetFileContent => self.file_content = String::new(),
            SpiderMutation::SetDefaultFilePaths(paths) => self.default_file_paths = paths,
            SpiderMutation::ResetDefaultFilePaths => self.default_file_paths = Vec::new(),
            SpiderMutation::SetCurrentGitBranch(branch) => self.current_git_branch = branch,
            SpiderMutation::ResetCurrentGitBranch => self.current_git_branch = String::new(),
            SpiderMutation::SetGitData(data) => self.git_data = data,
            SpiderMutation::ResetGitData => self.git_data = GitData::default(),
            SpiderMutation::SetGitChangeSelection(sel) => self.git_change_selection = sel,
            SpiderMutation::ResetGitChangeSelection => self.git_change_selection = Vec::new(),
        }
    }
}

impl From<SpiderMutation> for Commit<Spider, SpiderMutation> {
    fn from(m: SpiderMutation) -> Self {
        Self::Ext(m)
    }
}

// ── Actions ─────────────────────────────────────────────────────────

impl SpiderStore {
    fn files_path(&self, id: &EntityId, op: &str) -> String {
        format!("{}/files/{op}", self.item_path(id))
    }

    fn git_path(&self, id: &EntityId, op: Option<&str>) -> String {
        match op {
            Some(op) => format!("{}/git/{op}", self.item_path(id)),
            None => format!("{}/git", self.item_path(id)),
        }
    }

    /// Launch the spider as one or more tasks.
    pub async fn run_by_id(
        &self,
        id: &EntityId,
        options: &SpiderRunOptions,
    ) -> Result<Response, CoreError> {
        let path = format!("{}/run", self.item_path(id));
        let resp = self.transport().post(&path, json_body(options)?, None).await?;
        debug!(spider = %id, mode = %options.mode, "run requested");
        Ok(resp)
    }

    // ── Files ────────────────────────────────────────────────────────

    /// List a directory into `file_nav_items`.
    pub async fn list_dir(&self, id: &EntityId, path: &str) -> Result<Vec<FileNavItem>, CoreError> {
        let resp = self
            .transport()
            .get(&self.files_path(id, "list"), &Query::new().with("path", path))
            .await?;
        let items: Vec<FileNavItem> = decode_data("file", resp.data)?;

        self.commit(SpiderMutation::SetFileNavItems(items.clone()));
        Ok(items)
    }

    async fn fetch_file(&self, id: &EntityId, path: &str) -> Result<String, CoreError> {
        let resp = self
            .transport()
            .get(&self.files_path(id, "get"), &Query::new().with("path", path))
            .await?;
        decode_data("file", resp.data)
    }

    /// Load a file's text into `file_content`.
    pub async fn get_file(&self, id: &EntityId, path: &str) -> Result<String, CoreError> {
        let content = self.fetch_file(id, path).await?;
        self.commit(SpiderMutation::SetFileContent(content.clone()));
        Ok(content)
    }

    /// Load `item` and make it the open file, entering the editing state.
    ///
    /// On failure the previously open file and its buffer stay in place.
    pub async fn open_file(&self, id: &EntityId, item: FileNavItem) -> Result<String, CoreError> {
        let content = self.fetch_file(id, &item.path).await?;
        debug!(spider = %id, path = %item.path, bytes = content.len(), "file opened");

        self.commit_all([
            SpiderMutation::SetActiveFileNavItem(item).into(),
            SpiderMutation::SetFileContent(content.clone()).into(),
        ]);
        Ok(content)
    }

    /// Drop the open buffer and the selection, back to browsing.
    pub fn close_file(&self) {
        self.commit_all([
            SpiderMutation::ResetFileContent.into(),
            SpiderMutation::ResetActiveFileNavItem.into(),
        ]);
    }

    /// Metadata for one path. State is untouched.
    pub async fn get_file_info(&self, id: &EntityId, path: &str) -> Result<FileNavItem, CoreError> {
        let resp = self
            .transport()
            .get(&self.files_path(id, "info"), &Query::new().with("path", path))
            .await?;
        decode_data("file", resp.data)
    }

    /// Save text content as JSON `{path, data}`.
    pub async fn save_file(&self, id: &EntityId, path: &str, data: &str) -> Result<Response, CoreError> {
        let body = RequestBody::Json(json!({ "path": path, "data": data }));
        Ok(self.transport().post(&self.files_path(id, "save"), body, None).await?)
    }

    /// Save binary content as one multipart request with `path` and `file`.
    pub async fn save_file_binary(
        &self,
        id: &EntityId,
        path: &str,
        file: FileUpload,
    ) -> Result<Response, CoreError> {
        let form = MultipartForm::new()
            .text("path", path)
            .file("file", file.file_name, file.content);
        Ok(self
            .transport()
            .post(&self.files_path(id, "save"), form.into(), None)
            .await?)
    }

    pub async fn save_dir(&self, id: &EntityId, path: &str) -> Result<Response, CoreError> {
        let body = RequestBody::Json(json!({ "path": path }));
        Ok(self
            .transport()
            .post(&self.files_path(id, "save/dir"), body, None)
            .await?)
    }

    pub async fn rename_file(
        &self,
        id: &EntityId,
        path: &str,
        new_path: &str,
    ) -> Result<Response, CoreError> {
        let body = RequestBody::Json(json!({ "path": path, "new_path": new_path }));
        Ok(self
            .transport()
            .post(&self.files_path(id, "rename"), body, None)
            .await?)
    }

    pub async fn copy_file(
        &self,
        id: &EntityId,
        path: &str,
        new_path: &str,
    ) -> Result<Response, CoreError> {
        let body = RequestBody::Json(json!({ "path": path, "new_path": new_path }));
        Ok(self
            .transport()
            .post(&self.files_path(id, "copy"), body, None)
            .await?)
    }

    pub async fn delete_file(&self, id: &EntityId, path: &str) -> Result<Response, CoreError> {
        Ok(self
            .transport()
            .del(&self.files_path(id, "delete"), &Query::new().with("path", path))
            .await?)
    }

    // ── Git ──────────────────────────────────────────────────────────

    /// Fetch the working copy; the branch and the full data are committed
    /// together.
    pub async fn get_git(&self, id: &EntityId) -> Result<GitData, CoreError> {
        let resp = self
            .transport()
            .get(&self.git_path(id, None), &Query::new())
            .await?;
        let data: GitData = decode_data("git", resp.data)?;
        debug!(
            spider = %id,
            branch = %data.current_branch,
            logs = data.logs.len(),
            changes = data.changes.len(),
            "git fetched"
        );

        self.commit_all([
            SpiderMutation::SetCurrentGitBranch(data.current_branch.clone()).into(),
            SpiderMutation::SetGitData(data.clone()).into(),
        ]);
        Ok(data)
    }

    /// Pull from the remote. Call `get_git` to observe the result.
    pub async fn git_pull(&self, id: &EntityId) -> Result<Response, CoreError> {
        Ok(self
            .transport()
            .post(&self.git_path(id, Some("pull")), RequestBody::Empty, None)
            .await?)
    }

    /// Commit the paths in `git_change_selection` as of this call.
    /// The selection is left as is.
    pub async fn git_commit(&self, id: &EntityId) -> Result<Response, CoreError> {
        let paths = self.read(|s| s.ext.selected_paths());
        debug!(spider = %id, paths = paths.len(), "git commit");
        let body = RequestBody::Json(json!({ "paths": paths }));
        Ok(self
            .transport()
            .post(&self.git_path(id, Some("commit")), body, None)
            .await?)
    }

    /// Owned copy of [`SpiderState::git_logs_map`].
    pub fn git_logs_map(&self) -> IndexMap<String, GitLog> {
        self.read(|s| {
            s.ext
                .git_logs_map()
                .into_iter()
                .map(|(hash, log)| (hash.to_owned(), log.clone()))
                .collect()
        })
    }
}
