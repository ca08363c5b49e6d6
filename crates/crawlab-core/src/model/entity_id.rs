// ── Core identity types ──
//
// Every Crawlab resource is addressed by the server-assigned `_id`
// (a MongoDB ObjectId in hex). The `Entity` trait is the only thing the
// generic store knows about a record.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for any Crawlab resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Entity ──────────────────────────────────────────────────────────

/// A server-managed record the generic store can hold.
///
/// Stores never look past the identifier; everything else is opaque payload
/// that round-trips through serde.
pub trait Entity:
    Clone + Default + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Resource name used in logs and decode errors.
    const KIND: &'static str;

    fn id(&self) -> Option<&EntityId>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let id = EntityId::from("507f1f77bcf86cd799439011");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"507f1f77bcf86cd799439011\""
        );
    }

    #[test]
    fn from_str_roundtrip() {
        let id: EntityId = "abc".parse().unwrap();
        assert_eq!(id.to_string(), "abc");
    }
}
