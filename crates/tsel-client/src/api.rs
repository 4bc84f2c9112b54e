//! HTTP client for the target listing endpoint

use reqwest::StatusCode;
use url::Url;

use tsel_core::prelude::*;
use tsel_core::Target;

use crate::config::{targets_url, ClientConfig};

/// One-shot target listing over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTargetApi {
    client: reqwest::Client,
    targets_url: Url,
    auth_token: Option<String>,
}

impl HttpTargetApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::api(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            targets_url: targets_url(&config.base_url)?,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn targets_url(&self) -> &Url {
        &self.targets_url
    }

    /// Fetch the full list of known targets.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] for transport failures and undecodable bodies.
    /// - [`Error::ApiStatus`] when the server answers with a non-success status.
    pub async fn list_targets(&self) -> Result<Vec<Target>> {
        debug!("GET {}", self.targets_url);

        let mut request = self.client.get(self.targets_url.clone());
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::api(format!("Failed to reach {}: {e}", self.targets_url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::api(format!("Failed to read target list: {e}")))?;

        let targets = parse_targets(&body)?;
        debug!("Fetched {} target(s)", targets.len());
        Ok(targets)
    }
}

fn status_error(status: StatusCode) -> Error {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    Error::api_status(status.as_u16(), reason)
}

/// Decode a target listing response body.
pub fn parse_targets(body: &str) -> Result<Vec<Target>> {
    serde_json::from_str(body).map_err(|e| Error::api(format!("Invalid target list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let body = r#"[
            {"connectUrl": "service:jmx:rmi:///jndi/rmi://cryostat:9091/jmxrmi", "alias": "io.cryostat.Cryostat"},
            {"connectUrl": "service:jmx:rmi:///jndi/rmi://app:9093/jmxrmi", "alias": "demo", "labels": {"team": "perf"}}
        ]"#;

        let targets = parse_targets(body).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].alias, "io.cryostat.Cryostat");
        assert_eq!(targets[1].labels.get("team").map(String::as_str), Some("perf"));
    }

    #[test]
    fn test_parse_targets_rejects_non_array() {
        let err = parse_targets(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
    }

    #[test]
    fn test_status_error_message() {
        let err = status_error(StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Target API returned HTTP 401: Unauthorized");
    }

    #[test]
    fn test_new_builds_targets_url() {
        let config = ClientConfig::new("http://localhost:8181").unwrap();
        let api = HttpTargetApi::new(&config).unwrap();
        assert_eq!(
            api.targets_url().as_str(),
            "http://localhost:8181/api/v1/targets"
        );
    }

    #[tokio::test]
    async fn test_list_targets_unreachable_server_is_api_error() {
        // Port 9 (discard) on localhost is almost never listening.
        let config = ClientConfig::new("http://127.0.0.1:9")
            .unwrap()
            .with_request_timeout(std::time::Duration::from_millis(500));
        let api = HttpTargetApi::new(&config).unwrap();

        let err = api.list_targets().await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
