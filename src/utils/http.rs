use async_trait::async_trait;
use curl::easy::{Easy2, Handler, WriteError};
use std::time::Duration;

use crate::core::error::{Result, SubHunterError};
use crate::core::traits::{ApiRequest, HttpMethod, Transport};

/// Collector for response data
struct Collector(Vec<u8>);

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
        self.0.extend_from_slice(data);
        Ok(data.len())
    }
}

/// HTTP client using libcurl
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Perform a GET request
    pub fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut easy = Easy2::new(Collector(Vec::new()));

        easy.url(url)?;
        easy.timeout(self.timeout)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.ssl_verify_peer(true)?;
        easy.ssl_verify_host(true)?;

        let mut list = curl::easy::List::new();
        for (key, value) in headers {
            list.append(&format!("{}: {}", key, value))?;
        }
        easy.http_headers(list)?;

        easy.perform()?;

        let response_code = easy.response_code()?;
        let body = easy.get_ref().0.clone();

        Ok(HttpResponse {
            status_code: response_code as u16,
            body,
        })
    }

    /// Perform a POST request
    pub fn post(&self, url: &str, headers: &[(&str, &str)], body: &str) -> Result<HttpResponse> {
        let mut easy = Easy2::new(Collector(Vec::new()));

        easy.url(url)?;
        easy.timeout(self.timeout)?;
        easy.post(true)?;
        easy.post_fields_copy(body.as_bytes())?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.ssl_verify_peer(true)?;
        easy.ssl_verify_host(true)?;

        let mut list = curl::easy::List::new();
        for (key, value) in headers {
            list.append(&format!("{}: {}", key, value))?;
        }
        easy.http_headers(list)?;

        easy.perform()?;

        let response_code = easy.response_code()?;
        let body = easy.get_ref().0.clone();

        Ok(HttpResponse {
            status_code: response_code as u16,
            body,
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.clone())
            .map_err(|e| SubHunterError::Http(format!("Invalid UTF-8 in response body: {}", e)))
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 429
    }
}

/// Production transport: runs blocking libcurl transfers on the tokio
/// blocking pool.
pub struct CurlTransport {
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let client = HttpClient::with_timeout(self.timeout);
        let request = request.clone();

        tokio::task::spawn_blocking(move || {
            let header_refs: Vec<(&str, &str)> = request
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();

            match request.method {
                HttpMethod::Get => client.get(&request.url, &header_refs),
                HttpMethod::Post => client.post(
                    &request.url,
                    &header_refs,
                    request.body.as_deref().unwrap_or(""),
                ),
            }
        })
        .await
        .map_err(|e| SubHunterError::Http(format!("Task join error: {}", e)))?
    }
}
