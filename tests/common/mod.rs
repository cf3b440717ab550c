//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use flaky_retry::flaky::DrawSource;
use flaky_retry::resilience::{RecordingSleeper, Sleeper};
use flaky_retry::{HttpServer, ServiceConfig, Shutdown};

/// A running service whose `/call` targets its own `/sometimes`.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port.
///
/// When `upstream` is `None` the service calls itself.
#[allow(dead_code)]
pub async fn start_service(
    draws: Arc<dyn DrawSource>,
    sleeper: Arc<dyn Sleeper>,
    upstream: Option<SocketAddr>,
) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServiceConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.base_url = format!("http://{}", upstream.unwrap_or(addr));

    let server = HttpServer::new(config)
        .unwrap()
        .with_draws(draws)
        .with_sleeper(sleeper);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService { addr, shutdown }
}

/// Same as [`start_service`] with a recording sleeper handed back.
#[allow(dead_code)]
pub async fn start_recording_service(
    draws: Arc<dyn DrawSource>,
    upstream: Option<SocketAddr>,
) -> (TestService, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let service = start_service(draws, Arc::new(sleeper.clone()), upstream).await;
    (service, sleeper)
}

/// Start a programmable upstream with async support on an ephemeral port.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let f = Arc::new(f);
    start_raw_backend(move || {
        let f = f.clone();
        async move {
            let (status, body) = f().await;
            http_response(status, &body)
        }
    })
    .await
}

/// Start an upstream that writes whatever bytes `f` returns, then closes.
///
/// Lets a test send malformed or cut-short responses.
#[allow(dead_code)]
pub async fn start_raw_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let response_str = f().await;
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A complete `Connection: close` response.
#[allow(dead_code)]
pub fn http_response(status: u16, body: &str) -> String {
    let status_text = match status {
        200 => "200 OK",
        418 => "418 I'm a teapot",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    )
}

/// Headers promising `declared` body bytes, followed by only `body`.
#[allow(dead_code)]
pub fn truncated_response(status: u16, declared: usize, body: &str) -> String {
    let full = http_response(status, body);
    full.replacen(
        &format!("Content-Length: {}", body.len()),
        &format!("Content-Length: {}", declared),
        1,
    )
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
