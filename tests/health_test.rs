//! Liveness endpoint tests.

use std::time::Duration;

use reward_tracker::health;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn root_returns_static_ok_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(health::serve(listener, async move {
        stop_rx.await.ok();
    }));

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), health::BODY);

    let missing = reqwest::get(format!("http://{addr}/ledger")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not shut down")
        .unwrap()
        .unwrap();
}
