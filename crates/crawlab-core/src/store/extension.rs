// ── Resource-specific state extensions ──
//
// A resource that needs more than the shared collection state plugs in an
// `Extension`: its own state struct plus its own mutation enum. Both kinds
// of mutation enter the store through the same `commit` entry point.

use std::fmt::Debug;

use super::state::Mutation;

/// Extra state carried by one resource's store.
pub trait Extension: Clone + Debug + Default + Send + Sync + 'static {
    /// Named changes to the extension state. `as_ref()` yields the name
    /// used in trace logs.
    type Mutation: Debug + Send + AsRef<str>;

    fn apply(&mut self, mutation: Self::Mutation);
}

/// Extension for resources with no extra state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoExtension;

/// Uninhabited: [`NoExtension`] has nothing to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMutation {}

impl AsRef<str> for NoMutation {
    fn as_ref(&self) -> &str {
        match *self {}
    }
}

impl Extension for NoExtension {
    type Mutation = NoMutation;

    fn apply(&mut self, mutation: NoMutation) {
        match mutation {}
    }
}

/// Anything a store can commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit<T, M> {
    Base(Mutation<T>),
    Ext(M),
}

impl<T, M: AsRef<str>> Commit<T, M> {
    pub fn name(&self) -> &str {
        match self {
            Self::Base(m) => m.as_ref(),
            Self::Ext(m) => m.as_ref(),
        }
    }
}

impl<T, M> From<Mutation<T>> for Commit<T, M> {
    fn from(m: Mutation<T>) -> Self {
        Self::Base(m)
    }
}
