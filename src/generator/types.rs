use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 用户对某个澄清问题的回答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
}

impl QAPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// 生成报告的请求：原始查询 + 按顺序排列的问答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub user_query: String,
    #[serde(rename = "qaList")]
    pub qa_list: Vec<QAPair>,
}

/// 澄清问题的结构化输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionsModel {
    /// questions that will be asked to the user to better understand the requirement, motives, and aims.
    pub questions: Vec<String>,
}

/// 搜索规划的结构化输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryPlan {
    /// Queries that will be used for web search.
    pub queries: Vec<String>,
}

/// 澄清问题生成结果
///
/// 生成失败不会以错误返回，而是给出 `{"error": "..."}` 形状的哨兵值，
/// 调用方需要按结构区分两种结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClarifyingQuestions {
    Questions(Vec<String>),
    Failed { error: String },
}

impl ClarifyingQuestions {
    pub const FAILURE_MESSAGE: &'static str = "Failed to generate clarifying questions.";

    pub fn failed() -> Self {
        ClarifyingQuestions::Failed {
            error: Self::FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ClarifyingQuestions::Failed { .. })
    }
}

/// 调研流程中的可识别错误
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("search result #{index} is missing field `{field}`")]
    MissingResultField { index: usize, field: &'static str },

    #[error("state field `{0}` has already been written")]
    FieldAlreadyWritten(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clarifying_questions_wire_shape() {
        let ok = ClarifyingQuestions::Questions(vec!["a?".to_string(), "b?".to_string()]);
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!(["a?", "b?"]));

        let failed = ClarifyingQuestions::failed();
        assert!(failed.is_failed());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Failed to generate clarifying questions."})
        );
    }

    #[test]
    fn test_report_query_uses_camel_case_list() {
        let query: ReportQuery = serde_json::from_value(json!({
            "user_query": "q",
            "qaList": [{"question": "Which region?", "answer": "North America"}]
        }))
        .unwrap();

        assert_eq!(query.qa_list, vec![QAPair::new("Which region?", "North America")]);
    }

    #[test]
    fn test_report_query_requires_qa_list() {
        let result = serde_json::from_value::<ReportQuery>(json!({"user_query": "q"}));
        assert!(result.is_err());
    }
}
