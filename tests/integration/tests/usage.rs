//! Argument handling tests.

use am_cli::{run, Outcome};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::parse_args;

/// A server that fails the test if it receives any request.
async fn untouchable_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_no_arguments_prints_usage() -> anyhow::Result<()> {
    let server = untouchable_server().await;
    let base_url = server.uri();

    let outcome = run(parse_args(&["--base-url", base_url.as_str(), "--password", "pw"])).await?;

    assert!(matches!(outcome, Outcome::Usage));
    Ok(())
}

#[tokio::test]
async fn test_one_argument_prints_usage_without_side_effects() -> anyhow::Result<()> {
    let server = untouchable_server().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir()?;
    let missing_config = dir.path().join("absent.toml").display().to_string();

    let outcome = run(parse_args(&[
        "Login",
        "--base-url",
        base_url.as_str(),
        "--password",
        "pw",
        "--config",
        missing_config.as_str(),
    ]))
    .await?;

    // An unreadable config file would have failed the run had it been opened.
    assert!(matches!(outcome, Outcome::Usage));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
