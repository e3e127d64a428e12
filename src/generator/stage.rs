use anyhow::Result;
use async_trait::async_trait;

use crate::generator::context::ResearchContext;
use crate::generator::state::{ResearchPhase, ResearchState, StateUpdate};
use crate::llm::LanguageModel;
use crate::search::SearchProvider;

/// 调研流水线中的一个阶段：读取当前状态，返回自己负责的字段
#[async_trait]
pub trait ResearchStage<M, S>: Send + Sync
where
    M: LanguageModel,
    S: SearchProvider,
{
    /// 阶段名称，用于日志
    fn name(&self) -> &'static str;

    /// 该阶段所处的流程状态
    fn phase(&self) -> ResearchPhase;

    async fn execute(
        &self,
        context: &ResearchContext<M, S>,
        state: &ResearchState,
    ) -> Result<StateUpdate>;
}
