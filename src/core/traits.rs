use async_trait::async_trait;

use super::error::Result;
use crate::utils::http::HttpResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single outbound API call, fully assembled by the client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Seam between the client and the network. The production implementation
/// drives libcurl on the blocking pool; tests script responses instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse>;
}
