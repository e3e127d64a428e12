use anyhow::Result;

use crate::config::Config;
use crate::generator::combiner::combine;
use crate::generator::context::ResearchContext;
use crate::generator::orchestrator::ResearchOrchestrator;
use crate::generator::state::ResearchState;
use crate::generator::types::{QAPair, ReportQuery};
use crate::llm::LanguageModel;
use crate::search::SearchProvider;

/// 以给定的初始状态执行调研流水线，返回最终报告
pub async fn run_workflow<M, S>(
    context: &ResearchContext<M, S>,
    initial_state: ResearchState,
) -> Result<String>
where
    M: LanguageModel,
    S: SearchProvider,
{
    ResearchOrchestrator
        .execute_research_pipeline(context, initial_state)
        .await
}

/// 合并原始查询与澄清问答，构造全新的请求级状态并执行流水线
pub async fn generate_report<M, S>(
    context: &ResearchContext<M, S>,
    user_query: &str,
    qa_list: &[QAPair],
) -> Result<String>
where
    M: LanguageModel,
    S: SearchProvider,
{
    let combined_query = combine(user_query, qa_list);
    let initial_state = ResearchState::new(user_query, combined_query);
    run_workflow(context, initial_state).await
}

/// 启动入口：给定一次性请求时直接生成报告并输出到stdout，否则启动HTTP服务
pub async fn launch(config: &Config, request: Option<ReportQuery>) -> Result<()> {
    match request {
        Some(request) => {
            let context = ResearchContext::new(config.clone())?;
            let report = generate_report(&context, &request.user_query, &request.qa_list).await?;
            println!("{}", report);
            Ok(())
        }
        None => crate::server::serve(config).await,
    }
}
