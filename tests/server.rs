//! End-to-end tests over TCP.

use std::time::Duration;

use reqwest::StatusCode;

use redirect_tree::config::parse_config;

mod common;

#[tokio::test]
async fn test_serves_redirects_over_tcp() {
    let server = common::start_server(common::sample_config()).await;
    let client = common::client();

    let res = client.get(server.url("/romeo/documentation")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "http://rubydoc.info/gems/romeo");

    let res = client.get(server.url("/juliet/others")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-cascade"], "pass");
    assert_eq!(res.text().await.unwrap(), "Not Found: /others");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_swaps_service_trees() {
    let server = common::start_server(common::sample_config()).await;
    let client = common::client();

    let res = client.get(server.url("/verona")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let updated = parse_config(
        r#"
        [[mounts]]
        path = "/verona"
        service = "rubydoc-github"
        params = { user_name = "will" }
        "#,
    )
    .unwrap();
    server.config_updates.send(updated).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/verona")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "http://rubydoc.info/github/will/verona");

    // The old trees are gone, and so is the fallback page.
    let res = client.get(server.url("/venice")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let server = common::start_server(common::sample_config()).await;
    assert_eq!(server.shutdown.receiver_count(), 1);

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server stops after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
