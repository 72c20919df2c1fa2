//! Common test utilities and fixtures.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use am_cli::Cli;
use clap::Parser;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session token handed out by the mock service.
pub const TOKEN: &str = "AQIC5wM2LY4Sfcz-test-session";

/// Administrator password accepted by the mock service.
pub const PASSWORD: &str = "password";

const TREES: &str = "/am/json/realms/root/realm-config/authentication/authenticationtrees";

/// Mock access management service.
pub struct MockAm {
    /// Underlying mock server.
    pub server: MockServer,
}

impl MockAm {
    /// Starts a service that accepts the administrator login.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/am/json/realms/root/authenticate"))
            .and(header("x-openam-username", "amadmin"))
            .and(header("x-openam-password", PASSWORD))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tokenId": TOKEN,
                "successUrl": "/am/console",
                "realm": "/"
            })))
            .mount(&server)
            .await;
        Self { server }
    }

    /// Service root as configured in the exporter.
    pub fn base_url(&self) -> String {
        format!("{}/am", self.server.uri())
    }

    /// Serves a tree.
    pub async fn tree(&self, name: &str, body: Value) {
        self.get(&format!("{TREES}/trees/{name}"), ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Serves a node.
    pub async fn node(&self, node_type: &str, id: &str, body: Value) {
        self.get(
            &format!("{TREES}/nodes/{node_type}/{id}"),
            ResponseTemplate::new(200).set_body_json(body),
        )
        .await;
    }

    /// Serves a script.
    pub async fn script(&self, id: &str, body: Value) {
        self.get(&format!("/am/json/scripts/{id}"), ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Answers a node request with an error status.
    pub async fn failing_node(&self, node_type: &str, id: &str, status: u16) {
        self.get(
            &format!("{TREES}/nodes/{node_type}/{id}"),
            ResponseTemplate::new(status).set_body_string("{\"code\":500,\"message\":\"boom\"}"),
        )
        .await;
    }

    async fn get(&self, request_path: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(request_path))
            .and(header("iplanetdirectorypro", TOKEN))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }
}

/// Temporary workspace holding an empty config file and the output dir.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates the workspace.
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("config.toml"), "")?;
        Ok(Self { dir })
    }

    /// Output directory.
    pub fn out(&self) -> PathBuf {
        self.dir.path().join("export")
    }

    /// Arguments exporting `tree` from `am` into [`Workspace::out`].
    pub fn cli(&self, am: &MockAm, tree: &str) -> Cli {
        let config = self.dir.path().join("config.toml").display().to_string();
        let out = self.out().display().to_string();
        let base_url = am.base_url();
        parse_args(&[
            tree,
            out.as_str(),
            "--config",
            config.as_str(),
            "--base-url",
            base_url.as_str(),
            "--username",
            "amadmin",
            "--password",
            PASSWORD,
        ])
    }
}

/// Reads every file below `root`, keyed by `/`-separated relative path.
pub fn read_files(root: &Path) -> anyhow::Result<BTreeMap<String, Vec<u8>>> {
    fn visit(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                visit(root, &path, files)?;
            } else {
                let relative = path.strip_prefix(root)?.to_string_lossy().replace('\\', "/");
                files.insert(relative, std::fs::read(&path)?);
            }
        }
        Ok(())
    }

    let mut files = BTreeMap::new();
    visit(root, root, &mut files)?;
    Ok(files)
}

/// Reads one exported entity.
pub fn read_entity(root: &Path, relative: &str) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(root.join(relative))?;
    Ok(serde_json::from_str(&content)?)
}

/// Parses exporter arguments, without the program name.
pub fn parse_args(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("am-export").chain(args.iter().copied()))
        .expect("valid arguments")
}
