//! 语言模型接入层

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod client;

pub use client::LLMClient;

/// 调研流程各阶段依赖的模型调用契约
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 结构化输出：要求模型返回符合 `T` 的JSON Schema的数据
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;

    /// 自由文本输出
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
