use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the client used for PlaybackInfo lookups. `timeout` bounds every call end to end.
pub fn build_api_client(timeout: Duration) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Build the client used for transparent passthrough.
///
/// No total timeout (media streams stay open for hours) and redirects are handed back to the
/// caller instead of being followed.
pub fn build_passthrough_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build passthrough client: {}", e))
}
