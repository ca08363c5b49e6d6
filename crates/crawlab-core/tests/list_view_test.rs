#![allow(clippy::unwrap_used)]
// List-view controller: query changes re-fetch, row actions resynchronize.

mod common;

use std::sync::Arc;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use crawlab_core::{
    CoreError, EntityId, FilterCondition, FilterOp, ListView, Pagination, SortKey, TableColumn,
};

use common::{list, ok, rows, setup};

#[tokio::test]
async fn test_mount_and_query_changes_fetch() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("conditions", "[]"))
        .respond_with(list(rows("all", 10), 40))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("conditions", r#"[{"key":"name","op":"eq","value":"news"}]"#))
        .and(query_param("sort", "[]"))
        .respond_with(list(rows("news", 1), 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("sort", r#"[{"key":"name","d":"ascending"}]"#))
        .and(query_param("page", "1"))
        .respond_with(list(rows("sorted", 1), 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("page", "3"))
        .respond_with(list(json!([]), 1))
        .expect(1)
        .mount(&server)
        .await;

    let view = ListView::new(
        Arc::clone(console.spiders()),
        vec![TableColumn::new("name", "Name").sortable().filterable(true)],
    );

    assert_eq!(view.mount().await.unwrap().total, 40);
    view.set_filter(vec![FilterCondition::new("name", FilterOp::Equal, "news")])
        .await
        .unwrap();
    assert_eq!(view.rows().total, 1);

    view.set_sort(vec![SortKey::asc("name")]).await.unwrap();
    view.set_pagination(Pagination::new(3, 10)).await.unwrap();

    assert!(view.rows().data.is_empty());
    assert!(view.column("name").unwrap().has_sort);
}

#[tokio::test]
async fn test_empty_filter_by_key_clears_key() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .respond_with(list(json!([]), 0))
        .expect(2)
        .mount(&server)
        .await;

    let view = ListView::new(Arc::clone(console.spiders()), Vec::new());
    view.set_filter_by_key(
        "name",
        vec![FilterCondition::new("name", FilterOp::Contains, "a")],
    )
    .await
    .unwrap();
    view.set_filter_by_key("name", Vec::new()).await.unwrap();

    assert!(console
        .spiders()
        .read(|s| s.base.table_list_filter.is_empty()));
}

#[tokio::test]
async fn test_delete_row_resyncs_table_only() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t0"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("stats", "true"))
        .respond_with(list(rows("t", 2), 2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("all", "true"))
        .respond_with(list(rows("t", 2), 2))
        .expect(0)
        .mount(&server)
        .await;

    let view = ListView::new(Arc::clone(console.tasks()), Vec::new());
    view.delete_row(&"t0".into()).await.unwrap();

    assert_eq!(view.rows().total, 2);
}

#[tokio::test]
async fn test_delete_selected_in_global_view_refreshes_all_list() {
    let (server, console) = setup().await;

    for id in ["s0", "s1"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/spiders/{id}")))
            .respond_with(ok(json!(null)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("stats", "true"))
        .respond_with(list(rows("s", 1), 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("all", "true"))
        .respond_with(list(rows("s", 1), 1))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = ListView::new(Arc::clone(console.spiders()), Vec::new()).global();
    view.select([EntityId::from("s0"), EntityId::from("s1")]);
    view.delete_selected().await.unwrap();

    assert!(view.selection().is_empty());
    assert_eq!(console.spiders().read(|s| s.base.all_list.len()), 1);
}

#[tokio::test]
async fn test_partial_selection_delete_keeps_only_undeleted_ids() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/spiders/s0"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/spiders/s1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/spiders/s2"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .and(query_param("stats", "true"))
        .respond_with(list(rows("s", 2), 2))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = ListView::new(Arc::clone(console.spiders()), Vec::new());
    view.select(["s0", "s1", "s2"].map(EntityId::from));

    let err = view.delete_selected().await.unwrap_err();

    assert_eq!(err.as_transport().and_then(crawlab_api::Error::status), Some(500));
    assert_eq!(view.selection(), [EntityId::from("s1"), EntityId::from("s2")]);
    assert_eq!(view.rows().total, 2);
}

#[tokio::test]
async fn test_unmount_resets_query_state() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .respond_with(list(rows("s", 3), 3))
        .mount(&server)
        .await;

    let mut view = ListView::new(Arc::clone(console.spiders()), Vec::new());
    view.set_sort(vec![SortKey::desc("name")]).await.unwrap();
    view.set_pagination(Pagination::new(2, 3)).await.unwrap();
    view.unmount();

    console.spiders().read(|s| {
        assert!(s.base.table_list_sort.is_empty());
        assert!(s.base.table_data.is_empty());
        assert_eq!(s.base.table_pagination, Pagination::TABLE);
    });
}

#[tokio::test]
async fn test_subscribers_see_commits() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/spiders"))
        .respond_with(list(rows("s", 2), 2))
        .mount(&server)
        .await;

    let mut stream = console.spiders().subscribe().into_stream();
    let initial = stream.next().await.unwrap();
    assert!(initial.base.table_data.is_empty());

    console.spiders().get_list().await.unwrap();
    let next = stream.next().await.unwrap();
    assert_eq!(next.base.table_data.len(), 2);
}

// ── Plugins ─────────────────────────────────────────────────────────

fn plugin_rows() -> serde_json::Value {
    json!([
        {"_id": "p-running", "name": "a", "status": [{"status": "running"}], "active": true},
        {"_id": "p-stopped", "name": "b", "status": [{"status": "stopped"}]},
    ])
}

#[tokio::test]
async fn test_plugin_start_stop_rules() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/plugins"))
        .respond_with(list(plugin_rows(), 2))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/plugins/p-stopped/start"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/plugins/p-running/stop"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let view = console.plugin_list();
    view.view().mount().await.unwrap();

    view.start(&"p-stopped".into()).await.unwrap();
    view.stop(&"p-running".into()).await.unwrap();

    let err = view.start(&"p-running".into()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }), "got {err:?}");
    let err = view.stop(&"p-stopped".into()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_plugin_delete_requires_inactive() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/plugins"))
        .respond_with(list(plugin_rows(), 2))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/plugins/p-stopped"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/plugins/p-running"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;

    let view = console.plugin_list();
    view.view().mount().await.unwrap();

    assert!(view.delete(&"p-running".into()).await.is_err());
    view.delete(&"p-stopped".into()).await.unwrap();
}

#[tokio::test]
async fn test_plugin_action_on_unknown_row_is_rejected() {
    let (_server, console) = setup().await;
    let view = console.plugin_list();

    let err = view.start(&"ghost".into()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }), "got {err:?}");
}
