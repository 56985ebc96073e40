use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent to the Google APIs
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance shared by every platform client
///
/// This client is initialized lazily on first access and reused across the application.
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections to the Google API front ends
/// - **Compression**: Supports gzip, deflate, brotli, and zstd compression
/// - **HTTP/2**: Adaptive window sizing and keep-alive pings
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// let firestore = FirestoreClient::new(HTTP_CLIENT.clone(), tokens, &settings.firebase);
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        // Enable compression (gzip, deflate, brotli, zstd)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        // The emulator suite and the metadata server are plain http
        .https_only(false)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[test]
    fn test_user_agent_names_the_service() {
        assert!(USER_AGENT.starts_with("booking-relay/"));
    }
}
