use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::generator::agents::{QueryPlanner, ReportWriter, SearchExecutor};
use crate::generator::context::ResearchContext;
use crate::generator::stage::ResearchStage;
use crate::generator::state::{ResearchPhase, ResearchState};
use crate::llm::LanguageModel;
use crate::search::SearchProvider;

/// 各阶段耗时记录
#[derive(Debug, Default)]
pub struct TimingScope {
    phase_durations: Vec<(ResearchPhase, Duration)>,
}

impl TimingScope {
    pub fn record(&mut self, phase: ResearchPhase, duration: Duration) {
        self.phase_durations.push((phase, duration));
    }

    pub fn total(&self) -> Duration {
        self.phase_durations.iter().map(|(_, d)| *d).sum()
    }

    /// 格式化的执行时间报告
    pub fn summary(&self) -> String {
        self.phase_durations
            .iter()
            .map(|(phase, d)| format!("{}={:.3}s", phase, d.as_secs_f64()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 调研流水线编排器：规划 → 搜索 → 写作，线性执行、不重试
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 执行完整流水线，只返回最终报告；任一阶段失败即终止并向上传播
    pub async fn execute_research_pipeline<M, S>(
        &self,
        context: &ResearchContext<M, S>,
        initial_state: ResearchState,
    ) -> Result<String>
    where
        M: LanguageModel,
        S: SearchProvider,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("research", %run_id);

        async move {
            tracing::info!("开始执行调研流程");
            let mut timing = TimingScope::default();

            let state = self
                .execute_stage(&QueryPlanner, context, initial_state, &mut timing)
                .await?;
            let state = self
                .execute_stage(&SearchExecutor, context, state, &mut timing)
                .await?;
            let state = self
                .execute_stage(&ReportWriter, context, state, &mut timing)
                .await?;

            tracing::info!(
                phase = %ResearchPhase::Done,
                total_secs = timing.total().as_secs_f64(),
                timing = %timing.summary(),
                "调研流程执行完毕"
            );
            Ok(state.into_final_report())
        }
        .instrument(span)
        .await
    }

    /// 执行单个阶段并把产出合并进状态
    async fn execute_stage<M, S, T>(
        &self,
        stage: &T,
        context: &ResearchContext<M, S>,
        state: ResearchState,
        timing: &mut TimingScope,
    ) -> Result<ResearchState>
    where
        M: LanguageModel,
        S: SearchProvider,
        T: ResearchStage<M, S>,
    {
        let phase = stage.phase();
        tracing::info!(%phase, stage = stage.name(), "执行阶段");

        let started = Instant::now();
        let update = match stage.execute(context, &state).await {
            Ok(update) => update,
            Err(e) => {
                tracing::error!(%phase, stage = stage.name(), error = %e, "阶段执行失败");
                return Err(e);
            }
        };
        let elapsed = started.elapsed();
        timing.record(phase, elapsed);

        let state = state.merge(update)?;
        tracing::info!(
            %phase,
            next = %phase.next(),
            elapsed_ms = elapsed.as_millis() as u64,
            "阶段完成"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::{StubModel, StubSearch, stub_context};
    use crate::search::SearchError;
    use serde_json::json;

    fn planned_model(report: &str) -> StubModel {
        StubModel::new()
            .with_extract(json!({"queries": ["first", "second"]}))
            .with_prompt(report)
    }

    #[test]
    fn test_timing_scope_summary() {
        let mut timing = TimingScope::default();
        timing.record(ResearchPhase::Planning, Duration::from_millis(1500));
        timing.record(ResearchPhase::Searching, Duration::from_millis(500));

        assert_eq!(timing.total(), Duration::from_secs(2));
        assert_eq!(timing.summary(), "planning=1.500s searching=0.500s");
    }

    #[tokio::test]
    async fn test_pipeline_runs_stages_in_order() {
        let context = stub_context(planned_model("# Final"), StubSearch::new());

        let report = ResearchOrchestrator
            .execute_research_pipeline(&context, ResearchState::new("q", "q brief"))
            .await
            .unwrap();

        assert_eq!(report, "# Final");
        assert_eq!(context.search_client.recorded_queries(), vec!["first", "second"]);

        let calls = context.llm_client.recorded_calls();
        assert_eq!(calls.len(), 2);
        // 写作阶段拿到的是过滤后的搜索结果
        assert!(calls[1].1.contains("Raw page content for first"));
        assert!(!calls[1].1.contains("follow_up_questions"));
    }

    #[tokio::test]
    async fn test_search_failure_aborts_before_writing() {
        let context = stub_context(planned_model("# unused"), StubSearch::failing_on("second"));

        let err = ResearchOrchestrator
            .execute_research_pipeline(&context, ResearchState::new("q", "q brief"))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<SearchError>().is_some());
        assert_eq!(context.llm_client.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_planner_failure_aborts_pipeline() {
        let model = StubModel::new().with_extract_error("bad json");
        let context = stub_context(model, StubSearch::new());

        let result = ResearchOrchestrator
            .execute_research_pipeline(&context, ResearchState::new("q", "q brief"))
            .await;

        assert!(result.is_err());
        assert!(context.search_client.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_prewritten_state_is_rejected() {
        use crate::generator::state::StateUpdate;
        use crate::generator::types::WorkflowError;

        let context = stub_context(planned_model("# Final"), StubSearch::new());
        let state = ResearchState::new("q", "q brief")
            .merge(StateUpdate::SearchQueries(vec![]))
            .unwrap();

        let err = ResearchOrchestrator
            .execute_research_pipeline(&context, state)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WorkflowError>(),
            Some(WorkflowError::FieldAlreadyWritten("search_queries"))
        ));
    }
}
