// crawlab-core: Resource state layer between crawlab-api and console views.

pub mod config;
pub mod console;
pub mod error;
pub mod list_view;
pub mod model;
pub mod modules;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, RequestFencing, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use list_view::{ListView, PluginListView, TableColumn};
pub use modules::{
    FileNavState, PluginStore, SpiderMutation, SpiderState, SpiderStore, TaskMutation, TaskState,
    TaskStore,
};
pub use store::{
    Commit, Extension, Mutation, NoExtension, Page, ResourceState, ResourceStore, StoreState,
};
pub use stream::StateStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Entity, EntityId, FileNavItem, FileUpload, FilterCondition, FilterOp, GitChange, GitData,
    GitLog, GitRef, Pagination, Plugin, PluginDeployMode, PluginNodeStatus, PluginStatus,
    ResultRow, SortDirection, SortKey, Spider, SpiderRunOptions, Tab, Task, TaskMode, TaskStatus,
};
