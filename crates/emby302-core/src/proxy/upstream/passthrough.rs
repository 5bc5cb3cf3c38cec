//! Transparent single-host reverse proxy toward the Emby server.
//!
//! Everything the dispatcher does not redirect ends up here: the request is replayed against the
//! upstream with the same method, path, query, headers and body, and the upstream response is
//! streamed back untouched apart from hop-by-hop headers.

use axum::body::{Body, HttpBody};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use url::{Position, Url};

use crate::proxy::common::header_constants::HOP_BY_HOP_HEADERS;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Clone)]
pub struct Passthrough {
    client: reqwest::Client,
    origin: String,
    base_path: String,
    base_query: Option<String>,
}

impl Passthrough {
    /// `client` must not follow redirects; see `client_builder::build_passthrough_client`.
    pub fn new(client: reqwest::Client, host: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(host.trim())?;
        Ok(Self {
            client,
            origin: base[..Position::BeforePath].to_string(),
            base_path: base.path().to_string(),
            base_query: base.query().map(str::to_string),
        })
    }

    /// Upstream URL for an inbound URI: base path and request path joined with one slash,
    /// base query and request query joined with `&`.
    pub fn target_url(&self, uri: &Uri) -> String {
        let path = join_paths(&self.base_path, uri.path());
        let base_query = self.base_query.as_deref().filter(|q| !q.is_empty());
        let query = match (base_query, uri.query().filter(|q| !q.is_empty())) {
            (Some(a), Some(b)) => Some(format!("{}&{}", a, b)),
            (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
            (None, None) => None,
        };
        match query {
            Some(q) => format!("{}{}?{}", self.origin, path, q),
            None => format!("{}{}", self.origin, path),
        }
    }

    /// Replay `request` upstream and relay the answer.
    ///
    /// Both bodies are streamed. Transport failures, including a client aborting its upload
    /// mid-stream, become 502.
    pub async fn forward(&self, request: Request, peer: Option<SocketAddr>) -> Response {
        let (parts, body) = request.into_parts();
        let target = self.target_url(&parts.uri);

        // Content-Length is kept so fixed-size uploads are not re-framed as chunked.
        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        if let Some(peer) = peer {
            append_forwarded_for(&mut headers, peer);
        }

        tracing::debug!("Passthrough {} {}", parts.method, parts.uri.path());

        let mut builder = self.client.request(parts.method, &target).headers(headers);
        if !body.is_end_stream() {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("Passthrough to Emby failed for {}: {}", parts.uri.path(), e.without_url());
                return (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response();
            },
        };

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        response
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Remove the fixed hop-by-hop set plus anything the `Connection` header names.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    for name in named.iter().map(String::as_str).chain(HOP_BY_HOP_HEADERS.iter().copied()) {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let prior: Vec<&str> =
        headers.get_all(X_FORWARDED_FOR).iter().filter_map(|v| v.to_str().ok()).collect();
    let value = if prior.is_empty() { ip } else { format!("{}, {}", prior.join(", "), ip) };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
