//! HTTP client for the Lichess public API.
//!
//! Endpoints used:
//! - `GET {base}/user/{username}`: profile document
//! - `GET {base}/user/{username}/rating-history`: per-mode rating history
//!
//! Requests are single-shot: no retries, no caching, default timeouts.

use anyhow::{bail, Context};
use reqwest::{StatusCode, Url};

use super::models::{Profile, RatingHistoryEntry, SearchResult};

/// Public Lichess API root
pub const DEFAULT_API_URL: &str = "https://lichess.org/api";

const PROFILE_FAILURE: &str = "Failed to fetch user profile";
const HISTORY_FAILURE: &str = "Failed to fetch rating history";

/// Why a search failed. The display text is what the viewer sees.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The profile endpoint answered 404
    #[error("User not found")]
    NotFound,

    /// Any other non-success status, network failure or unreadable body
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl FetchError {
    fn transport(message: &str, source: reqwest::Error) -> Self {
        FetchError::Transport {
            message: message.to_string(),
            source: Some(source),
        }
    }

    fn status(message: &str) -> Self {
        FetchError::Transport {
            message: message.to_string(),
            source: None,
        }
    }
}

/// Client for the two read-only endpoints the dashboard needs
#[derive(Debug, Clone)]
pub struct LichessClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LichessClient {
    /// Create a client rooted at `base_url` (e.g. `https://lichess.org/api`)
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("API URL cannot be used as a base: {base_url}");
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(LichessClient { http, base_url })
    }

    /// Append path segments to the base URL, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Fetch a player's profile
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        let url = self.endpoint(&["user", username]);
        tracing::debug!(%url, "fetching profile");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(PROFILE_FAILURE, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            status if !status.is_success() => {
                tracing::debug!(%status, "profile request rejected");
                Err(FetchError::status(PROFILE_FAILURE))
            }
            _ => response
                .json::<Profile>()
                .await
                .map_err(|e| FetchError::transport(PROFILE_FAILURE, e)),
        }
    }

    /// Fetch a player's rating history for every mode
    pub async fn fetch_rating_history(
        &self,
        username: &str,
    ) -> Result<Vec<RatingHistoryEntry>, FetchError> {
        let url = self.endpoint(&["user", username, "rating-history"]);
        tracing::debug!(%url, "fetching rating history");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(HISTORY_FAILURE, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "rating history request rejected");
            return Err(FetchError::status(HISTORY_FAILURE));
        }

        response
            .json::<Vec<RatingHistoryEntry>>()
            .await
            .map_err(|e| FetchError::transport(HISTORY_FAILURE, e))
    }

    /// Fetch profile and history concurrently.
    ///
    /// Fails as a whole if either request fails; no partial result is returned.
    /// Both requests always run to completion so that a missing profile is
    /// reported as [`FetchError::NotFound`] whichever reply lands first.
    pub async fn search(&self, username: &str) -> Result<SearchResult, FetchError> {
        let username = username.trim();
        let (profile, history) = tokio::join!(
            self.fetch_profile(username),
            self.fetch_rating_history(username)
        );
        let result = profile.and_then(|profile| history.map(|history| (profile, history)));

        match result {
            Ok((profile, history)) => {
                tracing::info!(
                    username = %profile.username,
                    modes = history.len(),
                    "search completed"
                );
                Ok(SearchResult { profile, history })
            }
            Err(e) => {
                tracing::warn!(username, error = %e, source = ?std::error::Error::source(&e), "search failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PROFILE: &str = r#"{"id": "thibault", "username": "thibault", "url": "https://lichess.org/@/thibault",
        "perfs": {"blitz": {"games": 120, "rating": 1700, "prog": -5}}}"#;
    const HISTORY: &str = r#"[{"name": "Blitz", "points": [[2022, 5, 1, 1500], [2023, 5, 1, 1650]]}]"#;

    type Route = (&'static str, u16, &'static str);

    /// Serve canned JSON responses keyed by request path; unknown paths get 404
    async fn serve(routes: Vec<Route>) -> String {
        serve_slow(routes, None).await
    }

    /// Like [`serve`], holding back the reply for `slow.0` by `slow.1` milliseconds
    async fn serve_slow(routes: Vec<Route>, slow: Option<(&'static str, u64)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&buf[..read]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = routes
                        .iter()
                        .find(|(p, _, _)| *p == path)
                        .map(|(_, s, b)| (*s, *b))
                        .unwrap_or((404, "{}"));
                    if let Some((_, delay)) = slow.filter(|(p, _)| *p == path) {
                        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                    }
                    let response = format!(
                        "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}/api")
    }

    #[test]
    fn test_endpoint_escapes_username() {
        let client = LichessClient::new("https://lichess.org/api/").unwrap();
        assert_eq!(
            client.endpoint(&["user", "a b/c"]).as_str(),
            "https://lichess.org/api/user/a%20b%2Fc"
        );
        assert_eq!(
            client.endpoint(&["user", "x", "rating-history"]).as_str(),
            "https://lichess.org/api/user/x/rating-history"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(LichessClient::new("not a url").is_err());
        assert!(LichessClient::new("mailto:someone@example.com").is_err());
    }

    #[tokio::test]
    async fn test_search_success() {
        let base = serve(vec![
            ("/api/user/thibault", 200, PROFILE),
            ("/api/user/thibault/rating-history", 200, HISTORY),
        ])
        .await;
        let client = LichessClient::new(&base).unwrap();

        let result = client.search("  thibault ").await.unwrap();
        assert_eq!(result.profile.username, "thibault");
        assert_eq!(result.profile.perfs["blitz"].games, 120);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history[0].points.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let base = serve(vec![("/api/user/ghost/rating-history", 200, "[]")]).await;
        let client = LichessClient::new(&base).unwrap();

        let err = client.search("ghost").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found_when_history_fails_first() {
        // Both endpoints 404 for an unknown user; the history reply arrives first
        let base = serve_slow(
            vec![
                ("/api/user/ghost", 404, "{}"),
                ("/api/user/ghost/rating-history", 404, "{}"),
            ],
            Some(("/api/user/ghost", 50)),
        )
        .await;
        let client = LichessClient::new(&base).unwrap();

        let err = client.search("ghost").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_profile_server_error_is_transport_failure() {
        let base = serve(vec![
            ("/api/user/thibault", 503, "{}"),
            ("/api/user/thibault/rating-history", 200, HISTORY),
        ])
        .await;
        let client = LichessClient::new(&base).unwrap();

        let err = client.search("thibault").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.to_string(), "Failed to fetch user profile");
    }

    #[tokio::test]
    async fn test_history_failure_discards_profile() {
        let base = serve(vec![
            ("/api/user/thibault", 200, PROFILE),
            ("/api/user/thibault/rating-history", 404, "{}"),
        ])
        .await;
        let client = LichessClient::new(&base).unwrap();

        let err = client.search("thibault").await.unwrap_err();
        // A 404 on history is not a missing user
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.to_string(), "Failed to fetch rating history");
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_failure() {
        let base = serve(vec![
            ("/api/user/thibault", 200, "{\"id\": 42"),
            ("/api/user/thibault/rating-history", 200, HISTORY),
        ])
        .await;
        let client = LichessClient::new(&base).unwrap();

        match client.fetch_profile("thibault").await {
            Err(FetchError::Transport { message, source }) => {
                assert_eq!(message, "Failed to fetch user profile");
                assert!(source.is_some());
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = LichessClient::new(&format!("http://{addr}/api")).unwrap();

        let err = client.search("thibault").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
