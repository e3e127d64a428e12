use anyhow::Result;
use async_trait::async_trait;

use crate::generator::context::ResearchContext;
use crate::generator::stage::ResearchStage;
use crate::generator::state::{ResearchPhase, ResearchState, StateUpdate};
use crate::llm::LanguageModel;
use crate::search::{SearchProvider, SearchRecord};

const SYSTEM_PROMPT: &str = r#"You are a report writer who must examine and analyze a corpus of search results and data on a given topic and write an objective, detailed and comprehensive report
that incorporates all of the researched data.

Use headings for main sections and apply markdown formatting to structure the report.

Include all the reference and the links at the end."#;

fn user_prompt(user_query: &str, search_data: &str) -> String {
    format!(
        "You Ought to write the report for this topic {}. Here is all the researched data: {}.\n\
         Give out a highly detailed and comprehensive report include everything that was present in the research data",
        user_query, search_data
    )
}

/// 基于原始查询和全部搜索结果生成报告，模型输出原样返回
pub async fn synthesize_report<M>(
    llm: &M,
    user_query: &str,
    search_results: &[SearchRecord],
) -> Result<String>
where
    M: LanguageModel,
{
    let search_data = serde_json::to_string(search_results)?;
    llm.prompt(SYSTEM_PROMPT, &user_prompt(user_query, &search_data))
        .await
}

/// 写作阶段：user_query + search_results → final_report
#[derive(Default, Clone)]
pub struct ReportWriter;

#[async_trait]
impl<M, S> ResearchStage<M, S> for ReportWriter
where
    M: LanguageModel,
    S: SearchProvider,
{
    fn name(&self) -> &'static str {
        "ReportWriter"
    }

    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Writing
    }

    async fn execute(
        &self,
        context: &ResearchContext<M, S>,
        state: &ResearchState,
    ) -> Result<StateUpdate> {
        let report = synthesize_report(
            &context.llm_client,
            state.user_query(),
            state.search_results(),
        )
        .await?;

        tracing::info!(chars = report.len(), "报告撰写完成");
        Ok(StateUpdate::FinalReport(report))
    }
}
