//! LLM客户端 - 基于rig的统一模型服务接口

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::LanguageModel;

mod providers;

use providers::ProviderClient;

/// LLM客户端，进程启动时创建一次，各请求共享
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 单次调用，配置了超时时间时为每次尝试单独计时
    async fn call_with_timeout<T, Fut>(&self, fut: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match self.config.timeout_seconds {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
                .await
                .map_err(|_| anyhow!("模型调用超时（{}秒）", secs))?,
            None => fut.await,
        }
    }

    /// 通用重试逻辑：首次调用失败后最多再尝试 `max_retries` 次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match self.call_with_timeout(operation()).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if retries >= max_retries {
                        return Err(err);
                    }
                    retries += 1;
                    tracing::warn!(
                        attempt = retries,
                        max_retries,
                        error = %err,
                        "调用模型服务出错，重试中"
                    );
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor = self
            .client
            .create_extractor::<T>(&self.config.model, system_prompt, &self.config)?;

        self.retry_with_backoff(|| async { extractor.extract(user_prompt).await })
            .await
    }

    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self
            .client
            .create_agent(&self.config.model, system_prompt, &self.config)?;

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }
}
