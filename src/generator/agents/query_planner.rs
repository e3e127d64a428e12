use anyhow::Result;
use async_trait::async_trait;

use crate::generator::context::ResearchContext;
use crate::generator::stage::ResearchStage;
use crate::generator::state::{ResearchPhase, ResearchState, StateUpdate};
use crate::generator::types::QueryPlan;
use crate::llm::LanguageModel;
use crate::search::SearchProvider;

pub const DEFAULT_MAX_QUERIES: usize = 8;

const SYSTEM_PROMPT: &str = r#"You are an AI assistant that creates structured research plans.
Your task is to turn a user's general query into a set of focused search queries.
Always output valid JSON with a single key `queries`, whose value is a list of strings."#;

fn user_prompt(combined_context: &str, max_queries: usize) -> String {
    format!(
        r#"User asked: "{}"
Generate up to {}, specific search queries that cover different
facets of the topic. If there exists some serious consideration or cons include them in the search queries as well.
Return only a JSON object like:
{{
  "queries": ["first query", "second query", ...]
}}"#,
        combined_context, max_queries
    )
}

/// 把调研简报扩展为至多 `max_queries` 条搜索查询
///
/// 上限只写进提示词，模型多给的查询原样返回；模型调用失败直接向上传播。
pub async fn plan_queries<M>(llm: &M, combined_context: &str, max_queries: usize) -> Result<Vec<String>>
where
    M: LanguageModel,
{
    let plan: QueryPlan = llm
        .extract(SYSTEM_PROMPT, &user_prompt(combined_context, max_queries))
        .await?;
    Ok(plan.queries)
}

/// 规划阶段：combined_query_context → search_queries
#[derive(Default, Clone)]
pub struct QueryPlanner;

#[async_trait]
impl<M, S> ResearchStage<M, S> for QueryPlanner
where
    M: LanguageModel,
    S: SearchProvider,
{
    fn name(&self) -> &'static str {
        "QueryPlanner"
    }

    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Planning
    }

    async fn execute(
        &self,
        context: &ResearchContext<M, S>,
        state: &ResearchState,
    ) -> Result<StateUpdate> {
        let queries = plan_queries(
            &context.llm_client,
            state.combined_query_context(),
            context.config.workflow.max_queries,
        )
        .await?;

        tracing::info!(count = queries.len(), "搜索查询规划完成");
        Ok(StateUpdate::SearchQueries(queries))
    }
}
