//! HTTP client against a local server.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use number_fact::{FactError, HttpNumberFactClient, NumberFactClient};

async fn fact(Path(n): Path<i64>) -> Result<String, StatusCode> {
    if n == 13 {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(format!("{n} is a test number."))
}

async fn serve() -> SocketAddr {
    let app = Router::new().route("/:n", get(fact));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_fetches_plain_text_fact() {
    let addr = serve().await;
    let client = HttpNumberFactClient::new(format!("http://{addr}/"));

    assert_eq!(client.fetch(42).await.unwrap(), "42 is a test number.");
    assert_eq!(client.fetch(-7).await.unwrap(), "-7 is a test number.");
}

#[tokio::test]
async fn test_server_error_is_a_failure() {
    let addr = serve().await;
    let client = HttpNumberFactClient::new(format!("http://{addr}"));

    let err = client.fetch(13).await.unwrap_err();
    assert!(matches!(err, FactError::Status(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn test_connection_refused_is_a_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpNumberFactClient::new(format!("http://{addr}"));
    let err = client.fetch(1).await.unwrap_err();
    assert!(matches!(err, FactError::Request(_)));
}
