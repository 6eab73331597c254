use crate::stub_server::{closed_port_url, StubResponse, StubServer};
use apidiff::{
    diff::Change, ComparisonConfiguration, ComparisonHarness, ComparisonMode, Error, ErrorKind,
    RequestDefinition, Side,
};
use serde_json::json;

fn harness(old: &str, new: &str, mode: ComparisonMode) -> ComparisonHarness {
    ComparisonHarness::new(ComparisonConfiguration::new(old, new, mode))
}

#[tokio::test]
async fn added_field_is_the_only_change() {
    let old = StubServer::respond_json(200, json!({"a": 1}));
    let new = StubServer::respond_json(200, json!({"a": 1, "b": 2}));

    let result = harness(&old.url(), &new.url(), ComparisonMode::Batch)
        .compare(&RequestDefinition::new("resource", "GET", "/resource"))
        .await
        .unwrap();

    assert_eq!(result.old_status, 200);
    assert_eq!(result.new_status, 200);
    let changes = result.changes.unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.get("b"), Some(&Change::Added { to: json!(2) }));
}

#[tokio::test]
async fn both_services_receive_the_same_request() {
    let old = StubServer::respond_json(201, json!({"id": 7}));
    let new = StubServer::respond_json(201, json!({"id": 7}));
    let request = RequestDefinition::new("create", "post", "/items")
        .with_header("X-Token", "secret")
        .with_header("Content-Type", "application/json")
        .with_query_param("dry", "true")
        .with_body(r#"{"name":"x"}"#);

    let result = harness(&old.url(), &new.url(), ComparisonMode::Batch)
        .compare(&request)
        .await
        .unwrap();
    assert!(result.is_match());

    for server in [&old, &new] {
        let received = server.requests();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method, "POST");
        assert_eq!(received[0].uri, "/items?dry=true");
        assert_eq!(received[0].headers["x-token"], "secret");
        assert_eq!(received[0].headers["content-type"], "application/json");
        assert_eq!(received[0].body, r#"{"name":"x"}"#);
    }
}

#[tokio::test]
async fn non_success_statuses_are_compared_not_raised() {
    let old = StubServer::respond_json(200, json!({"a": 1}));
    let new = StubServer::respond_json(500, json!({"a": 1, "error": "boom"}));

    let single = harness(&old.url(), &new.url(), ComparisonMode::Single)
        .compare(&RequestDefinition::new("resource", "GET", "/"))
        .await
        .unwrap();
    assert_eq!(single.status_mismatch(), Some((200, 500)));
    assert_eq!(single.changes, None);

    let batch = harness(&old.url(), &new.url(), ComparisonMode::Batch)
        .compare(&RequestDefinition::new("resource", "GET", "/"))
        .await
        .unwrap();
    assert_eq!(batch.status_mismatch(), Some((200, 500)));
    assert_eq!(
        batch.changes.unwrap().get("error"),
        Some(&Change::Added { to: json!("boom") })
    );
}

#[tokio::test]
async fn plain_text_body_is_compared_as_a_string() {
    let old = StubServer::respond_json(200, json!({"a": 1}));
    let new = StubServer::start(|_| StubResponse::text(502, "Bad Gateway"));

    let result = harness(&old.url(), &new.url(), ComparisonMode::Batch)
        .compare(&RequestDefinition::new("resource", "GET", "/"))
        .await
        .unwrap();

    assert_eq!(
        result.changes.unwrap().get(""),
        Some(&Change::Modified {
            from: json!({"a": 1}),
            to: json!("Bad Gateway")
        })
    );
}

#[tokio::test]
async fn unreachable_service_is_reported_with_its_side() {
    let old = StubServer::respond_json(200, json!({}));
    let new_url = closed_port_url();

    let error = harness(&old.url(), &new_url, ComparisonMode::Batch)
        .compare(&RequestDefinition::new("resource", "GET", "/"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Transport);
    match &error {
        Error::Transport { side, .. } => assert_eq!(*side, Side::New),
        other => panic!("unexpected error: {}", other),
    }
    assert!(error.to_string().starts_with("Request to the new service failed"));
}

#[tokio::test]
async fn batch_reports_every_item_in_order() {
    let old = StubServer::start(|request| match request.uri.as_str() {
        "/users" => StubResponse::json(200, json!([{"id": 1}, {"id": 2}])),
        _ => StubResponse::json(200, json!({"status": "ok"})),
    });
    let new = StubServer::start(|request| match request.uri.as_str() {
        "/users" => StubResponse::json(200, json!([{"id": 2}, {"id": 1}])),
        _ => StubResponse::json(200, json!({"status": "degraded"})),
    });
    let mut configuration =
        ComparisonConfiguration::new(old.url(), new.url(), ComparisonMode::Batch);
    configuration.set_sort_arrays(true);
    let requests = vec![
        RequestDefinition::new("users", "GET", "/users"),
        RequestDefinition::new("health", "GET", "/health"),
        RequestDefinition::new("patch", "PATCH", "/users"),
    ];
    let mut out = Vec::new();

    let summary = ComparisonHarness::new(configuration)
        .compare_all(&requests, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.matched, 1);
    assert_eq!(summary.differed, 1);
    assert_eq!(summary.failed, 1);

    let output = String::from_utf8(out).unwrap();
    let users = output.find("Request: users").unwrap();
    let health = output.find("Request: health").unwrap();
    let patch = output.find("Request: patch").unwrap();
    assert!(users < health && health < patch);
    assert!(output.contains("\"from\": \"ok\""));
    assert!(output.contains("Invalid method PATCH"));
    assert_eq!(old.requests().len(), 2);
}
