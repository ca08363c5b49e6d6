// ── Domain model ──
//
// Typed views of the Crawlab resources the console manages. Every record
// keeps unknown server fields in a flattened map so a fetch-edit-save cycle
// never drops data.

pub mod entity_id;
pub mod file;
pub mod git;
pub mod plugin;
pub mod query;
pub mod spider;
pub mod tab;
pub mod task;

// ── Re-exports ──────────────────────────────────────────────────────

pub use entity_id::{Entity, EntityId};
pub use file::{FileNavItem, FileUpload};
pub use git::{GitChange, GitData, GitLog, GitRef};
pub use plugin::{Plugin, PluginDeployMode, PluginNodeStatus, PluginStatus};
pub use query::{FilterCondition, FilterOp, Pagination, SortDirection, SortKey};
pub use spider::{Spider, SpiderRunOptions};
pub use tab::Tab;
pub use task::{ResultRow, Task, TaskMode, TaskStatus};
