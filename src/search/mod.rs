//! Web搜索接入层

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{SearchConfig, SearchDepth};

pub mod tavily;

pub use tavily::TavilyClient;

/// 单条查询的原始搜索结果，字段由搜索服务决定
pub type SearchRecord = Map<String, Value>;

/// 搜索服务错误
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected search response: {0}")]
    UnexpectedBody(String),
}

/// 单条搜索请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub topic: String,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    pub include_raw_content: bool,
}

impl SearchRequest {
    /// 使用配置中的搜索参数构造请求
    pub fn new(query: &str, config: &SearchConfig) -> Self {
        Self {
            query: query.to_string(),
            topic: config.topic.clone(),
            search_depth: config.search_depth,
            max_results: config.max_results,
            include_raw_content: config.include_raw_content,
        }
    }
}

/// 可替换的搜索服务
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 服务名称
    fn name(&self) -> &str;

    /// 执行一条查询
    async fn search(&self, request: &SearchRequest) -> Result<SearchRecord, SearchError>;

    /// 并发执行一批查询，结果顺序与请求顺序一致；任一查询失败则整批失败
    async fn batch(&self, requests: &[SearchRequest]) -> Result<Vec<SearchRecord>, SearchError> {
        try_join_all(requests.iter().map(|request| self.search(request))).await
    }
}
