use anyhow::Result;
use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::generator::context::ResearchContext;
use crate::generator::stage::ResearchStage;
use crate::generator::state::{ResearchPhase, ResearchState, StateUpdate};
use crate::generator::types::WorkflowError;
use crate::llm::LanguageModel;
use crate::search::{SearchProvider, SearchRecord, SearchRequest};

/// 每条原始结果中必须删除的字段
pub const FILTERED_FIELDS: [&str; 3] = ["answer", "follow_up_questions", "images"];

/// 删除每条结果的直接答案、追问建议和图片
///
/// 删除不做存在性检查：任一结果缺少其中一个字段即整体失败，不返回部分结果。
pub fn strip_filtered_fields(
    mut records: Vec<SearchRecord>,
) -> Result<Vec<SearchRecord>, WorkflowError> {
    for (index, record) in records.iter_mut().enumerate() {
        for field in FILTERED_FIELDS {
            if record.remove(field).is_none() {
                return Err(WorkflowError::MissingResultField { index, field });
            }
        }
    }
    Ok(records)
}

/// 为每条规划好的查询发起一次搜索（整批并发），返回与查询一一对应的结果
pub async fn execute_search<S>(
    provider: &S,
    config: &SearchConfig,
    queries: &[String],
) -> Result<Vec<SearchRecord>>
where
    S: SearchProvider,
{
    let requests: Vec<SearchRequest> = queries
        .iter()
        .map(|query| SearchRequest::new(query, config))
        .collect();

    let records = provider.batch(&requests).await?;
    Ok(strip_filtered_fields(records)?)
}

/// 搜索阶段：search_queries → search_results
#[derive(Default, Clone)]
pub struct SearchExecutor;

#[async_trait]
impl<M, S> ResearchStage<M, S> for SearchExecutor
where
    M: LanguageModel,
    S: SearchProvider,
{
    fn name(&self) -> &'static str {
        "SearchExecutor"
    }

    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Searching
    }

    async fn execute(
        &self,
        context: &ResearchContext<M, S>,
        state: &ResearchState,
    ) -> Result<StateUpdate> {
        let results = execute_search(
            &context.search_client,
            &context.config.search,
            state.search_queries(),
        )
        .await?;

        tracing::info!(
            provider = context.search_client.name(),
            count = results.len(),
            "搜索执行完成"
        );
        Ok(StateUpdate::SearchResults(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::test_support::{StubModel, StubSearch, stub_context, tavily_like_record};
    use crate::search::SearchError;

    fn queries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_result_per_query_in_order() {
        let search = StubSearch::new();
        let planned = queries(&["remote work urban housing prices", "migration trends housing 2023"]);

        let results = execute_search(&search, &SearchConfig::default(), &planned)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["query"], "remote work urban housing prices");
        assert_eq!(results[1]["query"], "migration trends housing 2023");
        assert_eq!(search.recorded_queries().len(), 2);
    }

    #[tokio::test]
    async fn test_filters_exactly_three_fields() {
        let search = StubSearch::new();
        let results = execute_search(&search, &SearchConfig::default(), &queries(&["q"]))
            .await
            .unwrap();

        let original = tavily_like_record("q");
        let record = &results[0];
        for field in FILTERED_FIELDS {
            assert!(!record.contains_key(field));
        }
        for (key, value) in &original {
            if !FILTERED_FIELDS.contains(&key.as_str()) {
                assert_eq!(record.get(key), Some(value));
            }
        }
        assert_eq!(record.len(), original.len() - FILTERED_FIELDS.len());
    }

    #[tokio::test]
    async fn test_requests_use_search_config() {
        let search = StubSearch::new();
        execute_search(&search, &SearchConfig::default(), &queries(&["a", "b"]))
            .await
            .unwrap();

        let requests = search.requests.lock().unwrap().clone();
        for request in requests {
            assert_eq!(request.topic, "general");
            assert_eq!(request.max_results, 5);
            assert!(request.include_raw_content);
        }
    }

    #[tokio::test]
    async fn test_empty_queries_yield_empty_results() {
        let search = StubSearch::new();
        let results = execute_search(&search, &SearchConfig::default(), &[])
            .await
            .unwrap();

        assert!(results.is_empty());
        assert!(search.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_fails_whole_batch() {
        let search = StubSearch::dropping("images");
        let err = execute_search(&search, &SearchConfig::default(), &queries(&["a", "b"]))
            .await
            .unwrap_err();

        match err.downcast_ref::<WorkflowError>() {
            Some(WorkflowError::MissingResultField { index, field }) => {
                assert_eq!(*index, 0);
                assert_eq!(*field, "images");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_strip_reports_offending_index() {
        let mut second = tavily_like_record("b");
        second.remove("follow_up_questions");

        let err = strip_filtered_fields(vec![tavily_like_record("a"), second]).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::MissingResultField {
                index: 1,
                field: "follow_up_questions"
            }
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let search = StubSearch::failing_on("b");
        let err = execute_search(&search, &SearchConfig::default(), &queries(&["a", "b"]))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<SearchError>().is_some());
    }

    #[tokio::test]
    async fn test_stage_reads_planned_queries() {
        let context = stub_context(StubModel::new(), StubSearch::new());
        let state = ResearchState::new("q", "ctx")
            .merge(StateUpdate::SearchQueries(queries(&["x", "y"])))
            .unwrap();

        let update = SearchExecutor.execute(&context, &state).await.unwrap();

        match update {
            StateUpdate::SearchResults(results) => assert_eq!(results.len(), 2),
            other => panic!("unexpected update: {:?}", other),
        }
        assert_eq!(context.search_client.recorded_queries(), vec!["x", "y"]);
    }
}
