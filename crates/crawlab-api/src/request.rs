// Request shapes accepted by the transport.
//
// Query strings are ordered key/value pairs so the serialized URL is
// deterministic. Bodies are either JSON or a multipart form; the file-save
// endpoint accepts both on the same path.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

// ── Query ────────────────────────────────────────────────────────────

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, formatting the value with `Display`.
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.0.push((key.into(), value.to_string()));
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (k, v) in iter {
            query.push(k, v);
        }
        query
    }
}

// ── Body ─────────────────────────────────────────────────────────────

/// Request body for write verbs.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    pub fn json(value: &impl Serialize) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

// ── Multipart ────────────────────────────────────────────────────────

/// A single multipart field.
#[derive(Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    File { file_name: String, content: Bytes },
}

impl fmt::Debug for Part {
    // File contents can be large; only log their size.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::File { file_name, content } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("len", &content.len())
                .finish(),
        }
    }
}

/// Ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<(String, Part)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a text field, replacing any previous field of the same name.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name.into(), Part::Text(value.into()));
        self
    }

    /// Set a file field, replacing any previous field of the same name.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        self.set(
            name.into(),
            Part::File {
                file_name: file_name.into(),
                content: content.into(),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Part> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn fields(&self) -> &[(String, Part)] {
        &self.fields
    }

    fn set(&mut self, name: String, part: Part) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = part;
        } else {
            self.fields.push((name, part));
        }
    }

    /// Convert into a `reqwest` form for sending.
    pub(crate) fn into_reqwest(self) -> reqwest::multipart::Form {
        self.fields
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, part)| match part {
                Part::Text(value) => form.text(name, value),
                Part::File { file_name, content } => form.part(
                    name,
                    reqwest::multipart::Part::bytes(content.to_vec()).file_name(file_name),
                ),
            })
    }
}
