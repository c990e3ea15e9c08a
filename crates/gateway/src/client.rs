//! PortalClient - reqwest-backed transport with LMv1 signing

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use shared::{ClientConfig, ClientError, PortalCredentials, Result};
use std::time::Duration;
use tracing::debug;

use crate::signing::RequestSigner;
use crate::transport::ApiTransport;

/// Header carrying the API version
pub const VERSION_HEADER: &str = "X-Version";

/// Client for one portal
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: Client,
    base_url: String,
    api_version: u32,
    signer: RequestSigner,
}

impl PortalClient {
    pub fn new(config: &ClientConfig, credentials: &PortalCredentials) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("lmscript/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url(&credentials.company_name),
            api_version: config.api_version,
            signer: RequestSigner::from_credentials(credentials),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        // Sign exactly the body string that is sent
        let authorization = self
            .signer
            .authorization_now(method.as_str(), path, body.as_deref());

        debug!(method = %method, path, params = query.len(), "portal request");

        let mut request = self
            .http
            .request(method, &url)
            .query(query)
            .header(AUTHORIZATION, authorization)
            .header(VERSION_HEADER, self.api_version.to_string())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(|e| ClientError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ClientError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            debug!(status = status.as_u16(), path, "portal request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                path: path.to_string(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ApiTransport for PortalClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, query: &[(String, String)], body: &Value) -> Result<Value> {
        let body = serde_json::to_string(body)?;
        self.send(Method::POST, path, query, Some(body)).await
    }
}
