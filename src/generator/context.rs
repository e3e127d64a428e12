use anyhow::Result;

use crate::config::Config;
use crate::llm::{LLMClient, LanguageModel};
use crate::search::{SearchProvider, TavilyClient};

/// 调研上下文：进程级共享的模型客户端、搜索客户端和配置
pub struct ResearchContext<M = LLMClient, S = TavilyClient> {
    /// LLM调用器
    pub llm_client: M,
    /// 搜索调用器
    pub search_client: S,
    /// 配置
    pub config: Config,
}

impl ResearchContext {
    /// 按配置创建真实的模型与搜索客户端
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;
        let search_client = TavilyClient::new(&config.search);

        Ok(Self {
            llm_client,
            search_client,
            config,
        })
    }
}

impl<M, S> ResearchContext<M, S>
where
    M: LanguageModel,
    S: SearchProvider,
{
    pub fn with_clients(config: Config, llm_client: M, search_client: S) -> Self {
        Self {
            llm_client,
            search_client,
            config,
        }
    }
}
