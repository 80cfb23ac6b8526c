//! reqwest-backed [`Transport`].
//!
//! In the browser reqwest sits on `fetch`, so the session cookie is sent
//! by asking for `credentials: include`. Native builds keep their own
//! cookie jar instead.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::http::{ApiRequest, ApiResponse, Method, Transport};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: build_client(),
            base_url: config.base_url().to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "cookie-aware client unavailable, sessions will not persist");
            reqwest::Client::new()
        })
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> reqwest::Client {
    reqwest::Client::new()
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let mut builder = self
            .client
            .request(method(request.method), self.url(&request.path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::trace!(method = request.method.as_str(), path = %request.path, status, "response received");
        Ok(ApiResponse::new(status, body))
    }
}
