//! Studio endpoints used by the move dialog.
//!
//! [`StudioApi`] is the seam the session talks to; [`StudioClient`] is the
//! reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use xmove_model::{
    AncestorInfo, Locator, MoveRequest, MoveResult, OutlinePayload,
};

use crate::config::StudioConfig;
use crate::error::TransportError;

pub type ApiResult<T> = Result<T, TransportError>;

/// Outline fetch, ancestor fetch and relocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudioApi: Send + Sync {
    /// Fetch the concise outline of `course`.
    async fn fetch_outline(
        &self,
        course: &Locator,
    ) -> ApiResult<OutlinePayload>;

    /// Fetch the ancestor chain of `usage`, nearest parent first.
    async fn fetch_ancestors(
        &self,
        usage: &Locator,
    ) -> ApiResult<AncestorInfo>;

    /// Re-parent a block.
    async fn relocate(&self, request: &MoveRequest) -> ApiResult<MoveResult>;
}

/// HTTP client for a Studio instance
#[derive(Clone, Debug)]
pub struct StudioClient {
    client: Client,
    base_url: String,
    xblock_url_root: String,
    auth_token: Option<String>,
}

impl StudioClient {
    /// Create a client from validated configuration.
    pub fn new(config: &StudioConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;

        tracing::info!(
            target: "xmove::api",
            base_url = %config.base_url,
            "creating Studio client"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            xblock_url_root: normalize_root(&config.xblock_url_root),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` path of the concise course outline.
    pub fn outline_path(course: &Locator) -> String {
        format!("/course/{course}?format=concise")
    }

    /// `GET` path of a block's ancestor info.
    pub fn ancestors_path(&self, usage: &Locator) -> String {
        format!("{}/{usage}?fields=ancestorInfo", self.xblock_url_root)
    }

    /// `PATCH` path of the relocation endpoint.
    pub fn relocate_path(&self) -> String {
        format!("{}/", self.xblock_url_root)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Execute a request and decode a JSON body, mapping failures.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|err| {
                TransportError::Decode(err.to_string())
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        {
            tracing::warn!(
                target: "xmove::api",
                %status,
                "Studio rejected credentials"
            );
        }
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StudioApi for StudioClient {
    async fn fetch_outline(
        &self,
        course: &Locator,
    ) -> ApiResult<OutlinePayload> {
        let url = self.url(&Self::outline_path(course));
        tracing::debug!(target: "xmove::api", %url, "GET outline");
        let request = self.authorize(self.client.get(&url));
        self.execute(request).await
    }

    async fn fetch_ancestors(
        &self,
        usage: &Locator,
    ) -> ApiResult<AncestorInfo> {
        let url = self.url(&self.ancestors_path(usage));
        tracing::debug!(target: "xmove::api", %url, "GET ancestor info");
        let request = self.authorize(self.client.get(&url));
        self.execute(request).await
    }

    async fn relocate(&self, request: &MoveRequest) -> ApiResult<MoveResult> {
        let url = self.url(&self.relocate_path());
        tracing::debug!(
            target: "xmove::api",
            %url,
            source = %request.source,
            parent = %request.target_parent,
            index = ?request.target_index,
            "PATCH relocation"
        );
        let builder = self.authorize(self.client.patch(&url).json(request));
        self.execute(builder).await
    }
}

fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
