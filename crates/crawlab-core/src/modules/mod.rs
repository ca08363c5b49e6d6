// ── Resource modules ──
//
// Each module instantiates the generic store with its entity type and adds
// only its deltas: form defaults, endpoint overrides, extension state, and
// extension actions.

pub mod plugin;
pub mod spider;
pub mod task;

pub use plugin::PluginStore;
pub use spider::{FileNavState, SpiderMutation, SpiderState, SpiderStore};
pub use task::{TaskMutation, TaskState, TaskStore};
