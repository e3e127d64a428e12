//! 单元测试用的模型与搜索桩

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::Config;
use crate::generator::context::ResearchContext;
use crate::llm::LanguageModel;
use crate::search::{SearchError, SearchProvider, SearchRecord, SearchRequest};

/// 按顺序回放预设响应的模型桩
#[derive(Default)]
pub struct StubModel {
    extract_responses: Mutex<VecDeque<Result<Value, String>>>,
    prompt_responses: Mutex<VecDeque<Result<String, String>>>,
    /// 每次调用的 (system_prompt, user_prompt)
    pub calls: Mutex<Vec<(String, String)>>,
}

impl StubModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract(self, value: Value) -> Self {
        self.extract_responses.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn with_extract_error(self, message: &str) -> Self {
        self.extract_responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_prompt(self, text: &str) -> Self {
        self.prompt_responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn with_prompt_error(self, message: &str) -> Self {
        self.prompt_responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn recorded_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, system_prompt: &str, user_prompt: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        self.record(system_prompt, user_prompt);
        let next = self.extract_responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no stubbed extract response")),
        }
    }

    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.record(system_prompt, user_prompt);
        let next = self.prompt_responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no stubbed prompt response")),
        }
    }
}

/// 构造一个Tavily形状的原始结果
pub fn tavily_like_record(query: &str) -> SearchRecord {
    let value = json!({
        "query": query,
        "answer": null,
        "follow_up_questions": null,
        "images": [],
        "results": [{
            "title": format!("About {}", query),
            "url": format!("https://example.com/{}", query.replace(' ', "-")),
            "content": format!("Snippet for {}", query),
            "raw_content": format!("Raw page content for {}", query)
        }],
        "response_time": 1.0
    });
    match value {
        Value::Object(record) => record,
        _ => unreachable!(),
    }
}

/// 记录请求并返回Tavily形状结果的搜索桩
#[derive(Default)]
pub struct StubSearch {
    /// 命中该查询时返回错误
    pub fail_on: Option<String>,
    /// 从返回结果中删除的字段
    pub drop_field: Option<&'static str>,
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl StubSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(query: &str) -> Self {
        Self {
            fail_on: Some(query.to_string()),
            ..Self::default()
        }
    }

    pub fn dropping(field: &'static str) -> Self {
        Self {
            drop_field: Some(field),
            ..Self::default()
        }
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchRecord, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_on.as_deref() == Some(request.query.as_str()) {
            return Err(SearchError::Status {
                status: 500,
                body: "stub failure".to_string(),
            });
        }
        let mut record = tavily_like_record(&request.query);
        if let Some(field) = self.drop_field {
            record.remove(field);
        }
        Ok(record)
    }
}

pub fn stub_context(model: StubModel, search: StubSearch) -> ResearchContext<StubModel, StubSearch> {
    ResearchContext::with_clients(Config::default(), model, search)
}
