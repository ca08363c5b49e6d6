// Crawlab API response types
//
// Every endpoint wraps its payload in the same envelope:
// `{ "status": "ok", "message": "success", "data": ..., "total": N, "error": "" }`.
// `total` is only present on list endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Raw response envelope as sent by the server.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Envelope {
    /// Unwrap the envelope, turning a non-`ok` status into [`Error::Envelope`].
    ///
    /// A missing `status` is treated as success; some endpoints omit it.
    pub fn into_response(self) -> Result<Response, Error> {
        match self.status.as_deref() {
            None | Some("ok") => Ok(Response {
                data: self.data,
                total: self.total,
            }),
            Some(other) => Err(Error::Envelope {
                message: self
                    .error
                    .filter(|e| !e.is_empty())
                    .or(self.message)
                    .unwrap_or_else(|| format!("status={other}")),
            }),
        }
    }
}

/// `{data, total?}` result of a single-entity or write call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub data: Value,
    pub total: Option<u64>,
}

/// `{data, total}` result of a list call.
///
/// `total` is the server-side count for the whole filtered collection, not
/// the length of `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Value>,
    pub total: u64,
}

impl TryFrom<Response> for ListResponse {
    type Error = Error;

    /// `null` data is an empty page; any other non-array is a shape error.
    fn try_from(resp: Response) -> Result<Self, Error> {
        let data = match resp.data {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => {
                return Err(Error::Deserialization {
                    message: "expected an array in list response `data`".into(),
                    body: other.to_string(),
                });
            }
        };
        Ok(Self {
            total: resp.total.unwrap_or(0),
            data,
        })
    }
}
