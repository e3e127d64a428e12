//! Tavily搜索服务客户端

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{SearchError, SearchProvider, SearchRecord, SearchRequest};
use crate::config::{SearchConfig, SearchDepth};

/// Tavily `/search` 请求体
#[derive(Debug, Serialize)]
struct TavilySearchBody<'a> {
    query: &'a str,
    topic: &'a str,
    search_depth: SearchDepth,
    max_results: u32,
    include_raw_content: bool,
    include_answer: bool,
    include_images: bool,
}

impl<'a> From<&'a SearchRequest> for TavilySearchBody<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        Self {
            query: &request.query,
            topic: &request.topic,
            search_depth: request.search_depth,
            max_results: request.max_results,
            include_raw_content: request.include_raw_content,
            include_answer: false,
            include_images: false,
        }
    }
}

/// Tavily客户端，返回未经裁剪的原始响应对象
#[derive(Clone)]
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    api_base_url: String,
}

impl TavilyClient {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.api_base_url)
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &str {
        "Tavily"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchRecord, SearchError> {
        tracing::debug!(query = %request.query, "发起Tavily搜索");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&TavilySearchBody::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<Value>().await? {
            Value::Object(record) => Ok(record),
            other => Err(SearchError::UnexpectedBody(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}
