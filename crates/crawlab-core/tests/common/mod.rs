#![allow(dead_code, clippy::unwrap_used)]
// Shared helpers for crawlab-core integration tests.

use serde_json::{Value, json};
use url::Url;
use wiremock::{MockServer, ResponseTemplate};

use crawlab_core::{Console, ConsoleConfig, RequestFencing};

pub async fn setup() -> (MockServer, Console) {
    setup_with(RequestFencing::Disabled).await
}

pub async fn setup_with(fencing: RequestFencing) -> (MockServer, Console) {
    let server = MockServer::start().await;
    let config = ConsoleConfig {
        url: Url::parse(&format!("{}/api", server.uri())).unwrap(),
        fencing,
        ..ConsoleConfig::default()
    };
    let console = Console::new(config).unwrap();
    (server, console)
}

/// `{status: "ok", data}` envelope.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "ok",
        "message": "success",
        "data": data,
    }))
}

/// `{status: "ok", data, total}` list envelope.
pub fn list(data: Value, total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "ok",
        "message": "success",
        "data": data,
        "total": total,
    }))
}

/// `n` minimal rows with ids `{prefix}0..{prefix}n`.
pub fn rows(prefix: &str, n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"_id": format!("{prefix}{i}"), "name": format!("{prefix}-{i}")}))
            .collect(),
    )
}
