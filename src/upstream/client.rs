//! Outbound HTTP client for the upstream.

use axum::body::Body;
use axum::http::uri::InvalidUri;
use axum::http::{Method, Request, Uri};
use futures_util::StreamExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::UpstreamConfig;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::AppError;

/// Pooled client bound to a single upstream URI.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    uri: Uri,
    max_body_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, InvalidUri> {
        let uri: Uri = config.target().parse()?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            uri,
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// One `GET` against the upstream.
    ///
    /// A 2xx yields the body; any other status becomes [`AppError::Upstream`]
    /// and a connection failure, before or during the body, becomes
    /// [`AppError::Transport`]. Bodies longer than `max_body_bytes` are cut;
    /// an oversized 2xx is an [`AppError::Internal`].
    pub async fn fetch(&self, request_id: &str) -> Result<String, AppError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.uri.clone())
            .header(X_REQUEST_ID, request_id)
            .body(Body::empty())
            .map_err(|e| AppError::Internal(format!("failed to build upstream request: {e}")))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let (bytes, truncated) = read_capped(Body::new(body), self.max_body_bytes).await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if !parts.status.is_success() {
            return Err(AppError::Upstream {
                status: parts.status,
                body,
            });
        }

        if truncated {
            return Err(AppError::Internal(format!(
                "upstream body exceeds {} bytes",
                self.max_body_bytes
            )));
        }

        Ok(body)
    }
}

/// Read at most `limit` bytes of `body`; the flag says whether more was left.
async fn read_capped(body: Body, limit: usize) -> Result<(Vec<u8>, bool), AppError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| AppError::Transport(format!("reading body: {e}")))?;
        let room = limit - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok((buf, false))
}
