use http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::{GatewayError, Result};

pub const DEFAULT_UPSTREAM_URL: &str = "https://cocproxy.royaleapi.dev/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefixes a bare tag from a request path with `#`.
///
/// Tags embedded in upstream documents (league clan tags, war tags) already
/// carry the prefix and must not be run through this.
pub fn prefix_tag(raw: &str) -> String {
    format!("#{raw}")
}

/// Authenticated read-only client for the Clash of Clans API.
///
/// Every call is a single GET returning the raw JSON document. Tags are
/// passed as URL path segments so the `#` prefix is percent-encoded.
#[derive(Clone)]
pub struct CocClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl CocClient {
    pub fn new(base_url: Url, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("default reqwest client is well formed");

        CocClient {
            client,
            base_url,
            token,
        }
    }

    /// Fetches the current CWL league group for a clan.
    pub async fn league_group(&self, clan_tag: &str) -> Result<Value> {
        self.get(&["clans", clan_tag, "currentwar", "leaguegroup"])
            .await
    }

    /// Fetches one war document by its war tag.
    pub async fn war(&self, war_tag: &str) -> Result<Value> {
        self.get(&["clanwarleagues", "wars", war_tag]).await
    }

    /// Fetches a clan profile.
    pub async fn clan(&self, clan_tag: &str) -> Result<Value> {
        self.get(&["clans", clan_tag]).await
    }

    /// Fetches a clan's war log.
    pub async fn war_log(&self, clan_tag: &str) -> Result<Value> {
        self.get(&["clans", clan_tag, "warlog"]).await
    }

    async fn get(&self, segments: &[&str]) -> Result<Value> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::UpstreamFailure("upstream base URL has no path segments".into()))?
            .extend(segments);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamFailure(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| GatewayError::UpstreamFailure(e.to_string())),
            StatusCode::NOT_FOUND => Err(GatewayError::UpstreamNotFound),
            StatusCode::FORBIDDEN => Err(GatewayError::UpstreamForbidden),
            status => Err(GatewayError::UpstreamFailure(format!(
                "unexpected status {status} from {url}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> CocClient {
        let base_url = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        CocClient::new(base_url, "test-token".to_string())
    }

    #[tokio::test]
    async fn encodes_tag_and_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23TESTCLAN/currentwar/leaguegroup"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clans": []})))
            .mount(&server)
            .await;

        let doc = test_client(&server).league_group("#TESTCLAN").await.unwrap();
        assert_eq!(doc, json!({"clans": []}));
    }

    #[tokio::test]
    async fn maps_not_found_and_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23MISSING"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/clans/%23SHY/warlog"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(matches!(
            client.clan("#MISSING").await,
            Err(GatewayError::UpstreamNotFound)
        ));
        assert!(matches!(
            client.war_log("#SHY").await,
            Err(GatewayError::UpstreamForbidden)
        ));
    }

    #[tokio::test]
    async fn other_statuses_become_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clanwarleagues/wars/%23W1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server).war("#W1").await.unwrap_err();
        match err {
            GatewayError::UpstreamFailure(message) => assert!(message.contains("503")),
            other => panic!("expected UpstreamFailure, got {other:?}"),
        }
    }

    #[test]
    fn prefix_tag_adds_hash() {
        assert_eq!(prefix_tag("ABC123"), "#ABC123");
    }
}
