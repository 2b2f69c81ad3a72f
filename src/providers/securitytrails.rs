use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::SecurityTrailsConfig;
use crate::core::credentials::resolve_credential;
use crate::core::error::{Result, SubHunterError};
use crate::core::results::DiscoveryResult;
use crate::core::traits::{ApiRequest, HttpMethod, Transport};
use crate::utils::hostname::{qualify_fragment, within_apex};
use crate::utils::http::CurlTransport;
use crate::utils::RateLimiter;

#[derive(Debug, Deserialize)]
struct SubdomainListResponse {
    subdomains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DomainsListResponse {
    #[serde(default)]
    records: Vec<DomainRecord>,
}

#[derive(Debug, Deserialize)]
struct DomainRecord {
    hostname: Option<String>,
    domain: Option<String>,
}

/// Client for the SecurityTrails subdomain intelligence API.
///
/// Read-only after construction; calls are made one at a time with linear
/// backoff retries and a fixed pause between paginated requests.
pub struct SecurityTrailsClient {
    api_key: String,
    base_url: String,
    retries: u32,
    backoff: Duration,
    pacer: RateLimiter,
    transport: Box<dyn Transport>,
}

impl SecurityTrailsClient {
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        Self::with_config(api_key, SecurityTrailsConfig::default())
    }

    pub fn with_config(api_key: Option<&str>, config: SecurityTrailsConfig) -> Result<Self> {
        let transport = Box::new(CurlTransport::new(Duration::from_secs(config.timeout_secs)));
        Self::with_transport(api_key, config, transport)
    }

    /// Construct with an injected transport. Tests use this to script
    /// responses without touching the network.
    pub fn with_transport(
        api_key: Option<&str>,
        config: SecurityTrailsConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self> {
        let explicit = api_key.or(config.api_key.as_deref());
        let api_key = resolve_credential(explicit, |name| std::env::var(name).ok())?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
            backoff: Duration::from_millis(config.backoff_ms),
            pacer: RateLimiter::with_period(Duration::from_millis(config.page_pause_ms)),
            transport,
        })
    }

    fn headers(&self, with_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("APIKEY".to_string(), self.api_key.clone()),
            (
                "User-Agent".to_string(),
                format!("sub-hunter/{}", env!("CARGO_PKG_VERSION")),
            ),
        ];
        if with_body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers
    }

    /// Shared request path for both verbs: up to `retries` attempts, linear
    /// backoff, 429s and transport faults absorbed until exhaustion.
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: self.headers(body.is_some()),
            body: body.map(|b| b.to_string()),
        };

        for attempt in 1..=self.retries {
            match self.transport.send(&request).await {
                Ok(response) if response.status_code == 200 => {
                    return response.json();
                }
                Ok(response) if response.is_rate_limited() => {
                    let wait = self.backoff * attempt;
                    warn!(
                        "Rate limited (429) on {}. Sleeping {:?} and retrying...",
                        path, wait
                    );
                    sleep(wait).await;
                }
                Ok(response) => {
                    warn!(
                        "HTTP {} from {} (attempt {}/{})",
                        response.status_code, path, attempt, self.retries
                    );
                    sleep(self.backoff * attempt).await;
                }
                Err(e) => {
                    warn!(
                        "Request error on {}: {} (attempt {}/{})",
                        path, e, attempt, self.retries
                    );
                    sleep(self.backoff * attempt).await;
                }
            }
        }

        Err(SubHunterError::RequestExhausted {
            path: path.to_string(),
            attempts: self.retries,
        })
    }

    /// Simple listing endpoint: GET /domain/{domain}/subdomains.
    ///
    /// The endpoint returns subdomain fragments ("www", "api") which are
    /// rebuilt into fully qualified hostnames. A response without the
    /// expected field shape contributes nothing rather than failing.
    pub async fn list_subdomains(&self, domain: &str) -> Result<DiscoveryResult> {
        let path = format!("/domain/{}/subdomains", domain);
        info!("Requesting subdomains for {} (simple list)...", domain);

        self.pacer.wait().await;
        let raw = self.execute(HttpMethod::Get, &path, None).await?;

        let mut hostnames = BTreeSet::new();
        match serde_json::from_value::<SubdomainListResponse>(raw.clone()) {
            Ok(parsed) => {
                for fragment in &parsed.subdomains {
                    if let Some(hostname) = qualify_fragment(fragment, domain) {
                        hostnames.insert(hostname);
                    }
                }
            }
            Err(e) => {
                debug!("Unexpected response shape from {}: {}", path, e);
            }
        }

        info!("Found {} subdomains via list_subdomains", hostnames.len());
        Ok(DiscoveryResult::new(hostnames, raw))
    }

    /// Paginated search endpoint: POST /domains/list, filtered by apex
    /// domain. Stops at `max_pages` or at the first page with no records.
    pub async fn search_subdomains(
        &self,
        domain: &str,
        page_size: usize,
        max_pages: usize,
    ) -> Result<DiscoveryResult> {
        let path = "/domains/list";
        let mut hostnames = BTreeSet::new();
        let mut raw_pages = Vec::new();

        for page in 1..=max_pages {
            let body = serde_json::json!({
                "filter": { "apex_domain": domain },
                "limit": page_size,
                "page": page,
            });

            info!("Fetching page {}...", page);
            self.pacer.wait().await;
            let response = self.execute(HttpMethod::Post, path, Some(&body)).await?;

            let records = match serde_json::from_value::<DomainsListResponse>(response.clone()) {
                Ok(parsed) => parsed.records,
                Err(e) => {
                    debug!("Unexpected response shape from {}: {}", path, e);
                    Vec::new()
                }
            };
            raw_pages.push(response);

            if records.is_empty() {
                info!("No more records; stopping search");
                break;
            }

            for record in records {
                let candidate = record
                    .hostname
                    .filter(|h| !h.is_empty())
                    .or_else(|| record.domain.filter(|d| !d.is_empty()));

                if let Some(hostname) = candidate {
                    if within_apex(&hostname, domain) {
                        hostnames.insert(hostname);
                    }
                }
            }
        }

        info!(
            "search_subdomains aggregated {} unique hostnames",
            hostnames.len()
        );
        Ok(DiscoveryResult::new(
            hostnames,
            serde_json::json!({ "pages": raw_pages }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTransport;
    use crate::utils::http::HttpResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    struct ScriptState {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<(ApiRequest, Instant)>>,
    }

    /// Transport that replays a fixed response script and records every
    /// request with its arrival time.
    #[derive(Clone)]
    struct ScriptedTransport(Arc<ScriptState>);

    impl ScriptedTransport {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self(Arc::new(ScriptState {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }))
        }

        fn requests(&self) -> Vec<(ApiRequest, Instant)> {
            self.0.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
            self.0
                .requests
                .lock()
                .unwrap()
                .push((request.clone(), Instant::now()));
            Ok(self
                .0
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left"))
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status_code: status,
            body: body.as_bytes().to_vec(),
        }
    }

    fn test_config() -> SecurityTrailsConfig {
        SecurityTrailsConfig {
            backoff_ms: 50,
            page_pause_ms: 1,
            ..SecurityTrailsConfig::default()
        }
    }

    fn client_with(transport: Box<dyn Transport>) -> SecurityTrailsClient {
        SecurityTrailsClient::with_transport(Some("test-key"), test_config(), transport).unwrap()
    }

    #[tokio::test]
    async fn test_list_subdomains_qualifies_fragments() {
        let transport = ScriptedTransport::new(vec![response(
            200,
            r#"{"subdomains": ["www", "api.example.com", ""]}"#,
        )]);
        let probe = transport.clone();
        let client = client_with(Box::new(transport));

        let discovery = client.list_subdomains("example.com").await.unwrap();

        assert_eq!(
            discovery.hostnames,
            vec!["api.example.com".to_string(), "www.example.com".to_string()]
        );
        assert!(discovery.raw.get("subdomains").is_some());

        let requests = probe.requests();
        assert_eq!(requests.len(), 1);
        let (request, _) = &requests[0];
        assert_eq!(
            request.url,
            "https://api.securitytrails.com/v1/domain/example.com/subdomains"
        );
        assert!(request
            .headers
            .contains(&("APIKEY".to_string(), "test-key".to_string())));
        assert!(request
            .headers
            .contains(&("Accept".to_string(), "application/json".to_string())));
    }

    #[tokio::test]
    async fn test_list_subdomains_tolerates_missing_field() {
        let transport = ScriptedTransport::new(vec![response(200, r#"{"meta": {}}"#)]);
        let client = client_with(Box::new(transport));

        let discovery = client.list_subdomains("example.com").await.unwrap();

        assert!(discovery.hostnames.is_empty());
        assert!(discovery.raw.get("meta").is_some());
    }

    #[tokio::test]
    async fn test_search_stops_on_empty_page() {
        let transport = ScriptedTransport::new(vec![
            response(
                200,
                r#"{"records": [{"hostname": "a.example.com"}, {"hostname": "b.example.com"}]}"#,
            ),
            response(200, r#"{"records": [{"hostname": "a.example.com"}]}"#),
            response(200, r#"{"records": []}"#),
        ]);
        let probe = transport.clone();
        let client = client_with(Box::new(transport));

        let discovery = client
            .search_subdomains("example.com", 100, 10)
            .await
            .unwrap();

        let requests = probe.requests();
        assert_eq!(requests.len(), 3, "must stop at the first empty page");

        for (idx, (request, _)) in requests.iter().enumerate() {
            assert_eq!(
                request.url,
                "https://api.securitytrails.com/v1/domains/list"
            );
            let body: serde_json::Value =
                serde_json::from_str(request.body.as_ref().unwrap()).unwrap();
            assert_eq!(body["page"], (idx + 1) as u64);
            assert_eq!(body["limit"], 100);
            assert_eq!(body["filter"]["apex_domain"], "example.com");
        }

        assert_eq!(
            discovery.hostnames,
            vec!["a.example.com".to_string(), "b.example.com".to_string()]
        );
        assert_eq!(discovery.raw["pages"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_applies_apex_filter() {
        let transport = ScriptedTransport::new(vec![
            response(
                200,
                r#"{"records": [
                    {"hostname": "api.example.com"},
                    {"hostname": "evil-example.com"},
                    {"domain": "cdn.example.com"},
                    {}
                ]}"#,
            ),
            response(200, r#"{"records": []}"#),
        ]);
        let client = client_with(Box::new(transport));

        let discovery = client
            .search_subdomains("example.com", 100, 10)
            .await
            .unwrap();

        assert_eq!(
            discovery.hostnames,
            vec!["api.example.com".to_string(), "cdn.example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_retry_recovers_from_rate_limit() {
        let transport = ScriptedTransport::new(vec![
            response(429, ""),
            response(429, ""),
            response(200, r#"{"subdomains": ["www"]}"#),
        ]);
        let probe = transport.clone();
        let client = client_with(Box::new(transport));

        let discovery = client.list_subdomains("example.com").await.unwrap();
        assert_eq!(discovery.hostnames, vec!["www.example.com".to_string()]);

        let requests = probe.requests();
        assert_eq!(requests.len(), 3);

        let first_gap = requests[1].1 - requests[0].1;
        let second_gap = requests[2].1 - requests[1].1;
        assert!(first_gap >= Duration::from_millis(50));
        assert!(second_gap >= Duration::from_millis(100));
        assert!(
            second_gap > first_gap,
            "backoff must grow between attempts"
        );
    }

    #[tokio::test]
    async fn test_retry_exhaustion() {
        let mut mock = MockTransport::new();
        mock.expect_send().times(3).returning(|_| {
            Ok(HttpResponse {
                status_code: 500,
                body: b"upstream error".to_vec(),
            })
        });
        let client = client_with(Box::new(mock));

        let result = client.list_subdomains("example.com").await;

        match result {
            Err(SubHunterError::RequestExhausted { path, attempts }) => {
                assert_eq!(path, "/domain/example.com/subdomains");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RequestExhausted, got {:?}", other.map(|d| d.hostnames)),
        }
    }

    #[tokio::test]
    async fn test_transport_faults_are_retried() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(3)
            .returning(|_| Err(SubHunterError::Http("connection reset".to_string())));
        let client = client_with(Box::new(mock));

        let result = client.list_subdomains("example.com").await;
        assert!(matches!(
            result,
            Err(SubHunterError::RequestExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_stripped() {
        let transport =
            ScriptedTransport::new(vec![response(200, r#"{"subdomains": []}"#)]);
        let probe = transport.clone();
        let config = SecurityTrailsConfig {
            base_url: "https://api.securitytrails.com/v1/".to_string(),
            ..test_config()
        };
        let client =
            SecurityTrailsClient::with_transport(Some("test-key"), config, Box::new(transport))
                .unwrap();

        client.list_subdomains("example.com").await.unwrap();

        let requests = probe.requests();
        assert_eq!(
            requests[0].0.url,
            "https://api.securitytrails.com/v1/domain/example.com/subdomains"
        );
    }

    #[test]
    fn test_construction_requires_credential() {
        std::env::remove_var(crate::core::credentials::APIKEY_ENV);
        let result = SecurityTrailsClient::with_config(None, SecurityTrailsConfig::default());
        assert!(matches!(result, Err(SubHunterError::Config(_))));
    }
}
