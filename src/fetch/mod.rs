//! Retrieval of the raw dataset bytes from a URL or a local file.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads `url` and returns the body, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched dataset");
    Ok(bytes)
}

/// Loads a dataset from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("Failed to fetch {source}"))
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read {source}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!("{}/otp_dashboard_fetch_test.csv", env::temp_dir().display());
        std::fs::write(&path, b"route\n1\n").unwrap();

        let client = BasicClient::new().unwrap();
        let bytes = load_source(&client, &path).await.unwrap();
        assert_eq!(bytes, b"route\n1\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_errors() {
        let client = BasicClient::new().unwrap();
        let result = load_source(&client, "/nonexistent/otp_dashboard.csv").await;
        assert!(result.is_err());
    }
}
