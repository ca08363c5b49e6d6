// ── List query primitives ──
//
// Pagination window, column filters, and sort keys. Filters and sorts are
// serialized verbatim into the `conditions` / `sort` query parameters; the
// server is the only validator.

use serde::{Deserialize, Serialize};

// ── Pagination ──────────────────────────────────────────────────────

/// A page window. `page` is 1-based; both fields are kept ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPagination")]
pub struct Pagination {
    page: u32,
    size: u32,
}

#[derive(Deserialize)]
struct RawPagination {
    page: u32,
    size: u32,
}

impl From<RawPagination> for Pagination {
    fn from(raw: RawPagination) -> Self {
        Self::new(raw.page, raw.size)
    }
}

impl Pagination {
    /// Table default: first page of 10 rows.
    pub const TABLE: Self = Self { page: 1, size: 10 };
    /// Log default: first page of 1000 lines.
    pub const LOG: Self = Self {
        page: 1,
        size: 1000,
    };

    /// Clamp out-of-range values up to 1.
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            size: if size == 0 { 1 } else { size },
        }
    }

    pub const fn page(self) -> u32 {
        self.page
    }

    pub const fn size(self) -> u32 {
        self.size
    }

    /// Whether rows exist past this window, given the server's total.
    pub fn has_more(self, total: u64) -> bool {
        u64::from(self.page) * u64::from(self.size) < total
    }

    /// Number of pages needed for `total` rows (at least 1).
    pub fn page_count(self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size)).max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::TABLE
    }
}

// ── Filters ─────────────────────────────────────────────────────────

/// Filter operator, using the server's short codes.
///
/// Unknown codes are kept verbatim in [`FilterOp::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "ns")]
    NotSet,
    #[serde(rename = "c")]
    Contains,
    #[serde(rename = "nc")]
    NotContains,
    #[serde(rename = "r")]
    Regex,
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "nin")]
    NotIn,
    #[serde(untagged)]
    Other(String),
}

/// One column filter: `{key, op, value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub key: String,
    pub op: FilterOp,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterCondition {
    pub fn new(key: impl Into<String>, op: FilterOp, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }
}

// ── Sorting ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort key: `{key, d}`. Sequences are most-significant first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub key: String,
    #[serde(rename = "d")]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pagination_clamps_zero() {
        let p = Pagination::new(0, 0);
        assert_eq!((p.page(), p.size()), (1, 1));
    }

    #[test]
    fn pagination_deserialize_clamps() {
        let p: Pagination = serde_json::from_value(json!({"page": 0, "size": 20})).unwrap();
        assert_eq!((p.page(), p.size()), (1, 20));
    }

    #[test]
    fn has_more_uses_total_not_rows() {
        let p = Pagination::new(1, 10);
        assert!(p.has_more(11));
        assert!(!p.has_more(10));
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.page_count(21), 3);
    }

    #[test]
    fn filter_serializes_short_codes() {
        let conditions = vec![
            FilterCondition::new("name", FilterOp::Contains, "news"),
            FilterCondition::new("status", FilterOp::In, json!(["running", "pending"])),
        ];
        assert_eq!(
            serde_json::to_string(&conditions).unwrap(),
            r#"[{"key":"name","op":"c","value":"news"},{"key":"status","op":"in","value":["running","pending"]}]"#
        );
    }

    #[test]
    fn unknown_filter_op_survives_roundtrip() {
        let cond: FilterCondition =
            serde_json::from_value(json!({"key": "x", "op": "near", "value": 1})).unwrap();
        assert_eq!(cond.op, FilterOp::Other("near".into()));
        assert_eq!(serde_json::to_value(&cond).unwrap()["op"], "near");
    }

    #[test]
    fn sort_serializes_direction_as_d() {
        let sort = vec![SortKey::desc("create_ts"), SortKey::asc("name")];
        assert_eq!(
            serde_json::to_string(&sort).unwrap(),
            r#"[{"key":"create_ts","d":"descending"},{"key":"name","d":"ascending"}]"#
        );
    }
}
