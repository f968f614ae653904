#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use tokio::sync::oneshot;

use promhello_server::{app_state::AppState, config, server::BoundServer};

const LOOPBACK: &str = r#"
version: 1
app:
  listen: "127.0.0.1:0"
metrics:
  listen: "127.0.0.1:0"
shutdown:
  drain_grace_ms: 0
"#;

async fn bind_loopback() -> BoundServer {
    bind_with(LOOPBACK).await
}

async fn bind_with(yaml: &str) -> BoundServer {
    let cfg = config::load_from_str(yaml).unwrap();
    BoundServer::bind(AppState::new(cfg).unwrap()).await.unwrap()
}

#[tokio::test]
async fn concurrent_greetings_show_up_in_metrics() {
    let bound = bind_loopback().await;
    let app = format!("http://{}/", bound.app_addr().unwrap());
    let metrics = format!("http://{}/metrics", bound.metrics_addr().unwrap());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(bound.serve(async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();

    let before = client.get(&metrics).send().await.unwrap().text().await.unwrap();
    assert!(before.lines().any(|l| l == "app_requests_total 0"));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let client = client.clone();
            let url = app.clone();
            tokio::spawn(async move {
                let resp = client.get(&url).send().await.unwrap();
                (resp.status().as_u16(), resp.text().await.unwrap())
            })
        })
        .collect();
    for t in tasks {
        assert_eq!(t.await.unwrap(), (200, "Hello, Promethues!".to_string()));
    }

    let after = client.get(&metrics).send().await.unwrap().text().await.unwrap();
    assert!(after.lines().any(|l| l == "app_requests_total 5"));

    stop_tx.send(()).unwrap();
    server.await.unwrap().expect("clean shutdown");
}

#[tokio::test]
async fn bind_conflict_is_fatal() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let yaml = format!(
        "version: 1\napp:\n  listen: \"127.0.0.1:0\"\nmetrics:\n  listen: \"127.0.0.1:{port}\"\n"
    );
    let cfg = config::load_from_str(&yaml).unwrap();
    let err = match BoundServer::bind(AppState::new(cfg).unwrap()).await {
        Ok(_) => panic!("bind must fail while the port is taken"),
        Err(e) => e,
    };

    assert_eq!(err.client_code().as_str(), "BIND_FAILED");
    assert!(err.to_string().contains("metrics listener"));
    assert!(err.to_string().contains(&port.to_string()));
}

#[tokio::test]
async fn shutdown_marks_state_draining() {
    let bound = bind_loopback().await;
    let state = bound.state().clone();
    assert!(!state.is_draining());

    bound.serve(async {}).await.expect("clean shutdown");
    assert!(state.is_draining());
}

#[tokio::test]
async fn readyz_fails_before_listeners_close() {
    let bound = bind_with(
        r#"
version: 1
app:
  listen: "127.0.0.1:0"
metrics:
  listen: "127.0.0.1:0"
shutdown:
  drain_grace_ms: 2000
"#,
    )
    .await;
    let app = format!("http://{}/", bound.app_addr().unwrap());
    let readyz = format!("http://{}/readyz", bound.metrics_addr().unwrap());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(bound.serve(async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    assert_eq!(client.get(&readyz).send().await.unwrap().status().as_u16(), 200);

    stop_tx.send(()).unwrap();

    let mut status = 200;
    for _ in 0..50 {
        let resp = client.get(&readyz).send().await.unwrap();
        status = resp.status().as_u16();
        if status == 503 {
            assert_eq!(resp.text().await.unwrap(), "draining");
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, 503);

    // Still serving traffic during the grace period.
    let greeting = client.get(&app).send().await.unwrap();
    assert_eq!(greeting.status().as_u16(), 200);

    server.await.unwrap().expect("clean shutdown");
}
