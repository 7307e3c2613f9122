//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirect_tree::config::{parse_config, RedirectConfig};
use redirect_tree::{HttpServer, Shutdown};

/// The reference layout: one tree per prefix and a default page at `/`.
pub const SAMPLE_CONFIG: &str = r#"
[fallback]
body = "Default page"

[[mounts]]
path = "/othello"
service = "github"
params = { user_name = "will" }

[[mounts]]
path = "/iago"
service = "github"
params = { user_name = "will", project = "othello" }

[[mounts]]
path = "/romeo"
service = "github"
params = { user_name = "will" }

  [[mounts.children]]
  service = "github-issues"

  [[mounts.children]]
  service = "github-pages"

  [[mounts.children]]
  service = "rubydoc"
  mount = "documentation"

[[mounts]]
path = "/juliet"
service = "github"
params = { user_name = "will", project = "romeo" }

  [[mounts.children]]
  service = "rubydoc"

[[mounts]]
path = "/venice"
service = "rubydoc"

[[mounts]]
path = "/hamlet"
service = "maven"
params = { group_id = "org.elsinore" }

[[mounts]]
path = "/lear"
service = "github"
"#;

pub fn sample_config() -> RedirectConfig {
    parse_config(SAMPLE_CONFIG).expect("sample config is valid")
}

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<RedirectConfig>,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(config: RedirectConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        config_updates,
        handle,
    }
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
