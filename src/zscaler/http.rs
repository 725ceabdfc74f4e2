use super::source::{parse_published, RemoteRangeSource};
use crate::error::SyncError;
use crate::json;
use reqwest::Client;
use std::time::Duration;

/// Fetches the published range list over HTTP(S).
pub struct HttpRangeSource {
    client: Client,
    url: String,
}

impl HttpRangeSource {
    pub fn new(url: &str, timeout: Duration) -> Result<HttpRangeSource, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(HttpRangeSource {
            client,
            url: url.to_string(),
        })
    }
}

impl RemoteRangeSource for HttpRangeSource {
    async fn fetch(&self) -> Result<Vec<String>, SyncError> {
        log::info!("Fetching IP addresses from {}...", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Fetch(format!("GET {}: {e}", self.url)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Fetch(format!("reading body of {}: {e}", self.url)))?;
        if !status.is_success() {
            log::warn!("GET {} returned {status}", self.url);
            return Err(SyncError::Fetch(format!(
                "GET {} returned {status}: {}",
                self.url,
                json::truncate(&body)
            )));
        }

        let prefixes = parse_published(&body, &self.url)?;
        log::info!(
            "Successfully fetched {} IP ranges from {}",
            prefixes.len(),
            self.url
        );
        Ok(prefixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CannedServer;

    fn source_for(server: &CannedServer) -> HttpRangeSource {
        let url = format!("{}/ips.json", server.url());
        HttpRangeSource::new(&url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_reads_prefixes() {
        let body = r#"{"prefixes": ["165.225.0.0/23", "2a03:eec0:1411::/48"]}"#;
        let server = CannedServer::start(vec![(200, body)]).await;
        let ranges = source_for(&server).fetch().await.unwrap();
        assert_eq!(ranges, vec!["165.225.0.0/23", "2a03:eec0:1411::/48"]);
        assert!(server.requests()[0].line.starts_with("GET /ips.json "));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_fetch_error() {
        let server = CannedServer::start(vec![(503, "maintenance")]).await;
        let err = source_for(&server).fetch().await.unwrap_err();
        let SyncError::Fetch(message) = &err else {
            panic!("expected a fetch error, got {err:?}");
        };
        assert!(message.contains("503"), "{message}");
        assert!(message.contains("maintenance"), "{message}");
    }

    #[tokio::test]
    async fn test_fetch_non_json_is_fetch_error() {
        let server = CannedServer::start(vec![(200, "<html>captive portal</html>")]).await;
        let err = source_for(&server).fetch().await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_fetch_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/ips.json", listener.local_addr().unwrap());
        drop(listener);
        let source = HttpRangeSource::new(&url, Duration::from_secs(5)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(_)), "{err:?}");
    }
}
