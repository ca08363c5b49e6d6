// ── Resource store factory ──
//
// `ResourceStore<T, X>` is the uniform container every resource module is
// built from. Resource-specific behavior lives in `crate::modules` as an
// `Extension` plus inherent methods on the concrete store type.

mod extension;
pub(crate) mod fence;
mod resource;
mod state;

pub use extension::{Commit, Extension, NoExtension, NoMutation};
pub use resource::{Page, ResourceStore, ResourceStoreBuilder, StoreState};
pub use state::{FormFactory, Mutation, ResourceState, StateDefaults};

pub(crate) use resource::{decode_data, decode_rows, json_body};
