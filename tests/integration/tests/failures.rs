//! Failure handling tests.

use am_cli::{run, CliError};
use am_tree::ExportError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{read_files, MockAm, Workspace};

#[tokio::test]
async fn test_http_error_stops_before_later_siblings() -> anyhow::Result<()> {
    let am = MockAm::start().await;
    am.tree(
        "Broken",
        json!({
            "_id": "Broken",
            "script": "after-nodes",
            "nodes": [
                { "_id": "a", "nodeType": "UsernameCollectorNode" },
                { "_id": "b", "nodeType": "PasswordCollectorNode" },
                { "_id": "c", "nodeType": "DataStoreDecisionNode" }
            ]
        }),
    )
    .await;
    am.node("UsernameCollectorNode", "a", json!({ "_id": "a" })).await;
    am.failing_node("PasswordCollectorNode", "b", 500).await;
    am.node("DataStoreDecisionNode", "c", json!({ "_id": "c" })).await;
    am.script("after-nodes", json!({ "name": "unused" })).await;
    let ws = Workspace::new()?;

    let err = run(ws.cli(&am, "Broken")).await.unwrap_err();

    match err {
        CliError::Export(ExportError::Transport { url, status, body }) => {
            assert!(url.ends_with("/authenticationtrees/nodes/PasswordCollectorNode/b"));
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let files: Vec<String> = read_files(&ws.out())?.into_keys().collect();
    assert_eq!(files, ["AuthTree/Broken.json", "UsernameCollector/a.json"]);
    Ok(())
}

#[tokio::test]
async fn test_error_message_names_url_and_status() -> anyhow::Result<()> {
    let am = MockAm::start().await;
    let ws = Workspace::new()?;

    let err = run(ws.cli(&am, "Missing")).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("/trees/Missing"), "{message}");
    assert!(message.contains("status: 404"), "{message}");
    assert!(!ws.out().exists());
    Ok(())
}

#[tokio::test]
async fn test_rejected_login_aborts_before_traversal() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/am/json/realms/root/authenticate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "reason": "Unauthorized",
            "message": "Access Denied"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let am = MockAm { server };
    let ws = Workspace::new()?;

    let err = run(ws.cli(&am, "Login")).await.unwrap_err();

    assert!(matches!(err, CliError::Export(ExportError::Session(_))));
    assert!(!ws.out().exists());
    Ok(())
}
