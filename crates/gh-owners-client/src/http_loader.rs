//! HTTP implementation of `OwnersLoader`

use crate::error::OwnersError;
use crate::owners::{owners_url, parse_owners, Owners};
use crate::OwnersLoader;
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches owners from `GET <endpoint>?org=&repo=&pr=`
#[derive(Debug, Clone)]
pub struct HttpOwnersLoader {
    http_client: reqwest::Client,
}

impl HttpOwnersLoader {
    /// Create a loader with the default request timeout
    pub fn new() -> Result<Self, OwnersError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, OwnersError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("gh-gov-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl OwnersLoader for HttpOwnersLoader {
    async fn load_owners(
        &self,
        endpoint: &str,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Owners, OwnersError> {
        let url = owners_url(endpoint, org, repo, number)?;
        debug!("Loading owners from {}", url);

        let response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Owners endpoint {} returned {}", url, status);
            return Err(OwnersError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let owners = parse_owners(&body)?;
        if owners.needs_lgtm == 0 {
            return Err(OwnersError::NoRequiredApprovals {
                org: org.to_string(),
                repo: repo.to_string(),
                number,
            });
        }

        debug!(
            "Owners of {}/{}#{}: {} approvers, needs {} LGTMs",
            org,
            repo,
            number,
            owners.approvers.len(),
            owners.needs_lgtm
        );
        Ok(owners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and hand back the request line
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/owners", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {}\r\n\
                 content-type: application/json\r\n\
                 content-length: {}\r\n\
                 connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            request.lines().next().unwrap_or_default().to_string()
        });

        (endpoint, handle)
    }

    #[tokio::test]
    async fn test_load_owners_success() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"approvers": ["alice"], "reviewers": ["alice", "bob"], "needsLgtm": 2}"#,
        )
        .await;

        let loader = HttpOwnersLoader::new().unwrap();
        let owners = loader
            .load_owners(&endpoint, "pingcap", "tidb", 7)
            .await
            .unwrap();

        assert!(owners.is_approver("alice"));
        assert_eq!(owners.needs_lgtm, 2);

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /owners?org=pingcap&repo=tidb&pr=7 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_load_owners_non_success_status() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "{}").await;

        let loader = HttpOwnersLoader::new().unwrap();
        let err = loader
            .load_owners(&endpoint, "pingcap", "tidb", 7)
            .await
            .unwrap_err();

        assert!(matches!(err, OwnersError::Status { status: 500, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_load_owners_malformed_body() {
        let (endpoint, server) = serve_once("200 OK", r#"{"message": "sig not found"}"#).await;

        let loader = HttpOwnersLoader::new().unwrap();
        let err = loader
            .load_owners(&endpoint, "pingcap", "tidb", 7)
            .await
            .unwrap_err();

        assert!(matches!(err, OwnersError::Malformed(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_load_owners_zero_lgtm() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"approvers": ["alice"], "needsLgtm": 0}"#).await;

        let loader = HttpOwnersLoader::new().unwrap();
        let err = loader
            .load_owners(&endpoint, "pingcap", "tidb", 7)
            .await
            .unwrap_err();

        assert!(matches!(err, OwnersError::NoRequiredApprovals { number: 7, .. }));
        server.await.unwrap();
    }
}
