use crate::generator::types::{ClarifyingQuestions, QuestionsModel};
use crate::llm::LanguageModel;

const SYSTEM_PROMPT: &str = r#"Based on the following user query, generate 3 follow-up questions that would help clarify what the user wants to know.
These questions should:
1. Seek to understand the user's specific information needs, requirements or goal for seeking this information
2. Clarify ambiguous terms or concepts in the original query
3. Determine the scope or boundaries of what the user is looking for
4. Identify the user's level of familiarity with the topic"#;

fn user_prompt(user_query: &str) -> String {
    format!(
        r#"User asked: "{}"
Generate 3 follow up questions
Return only a JSON object like:
{{
  "questions": ["question one", "question two", ...]
}}"#,
        user_query
    )
}

/// 生成澄清问题
///
/// 模型调用的任何失败（超时、结构化输出解析失败、服务错误）都在这里被吞掉，
/// 转换为 [`ClarifyingQuestions::Failed`]。返回的问题数量不做校验。
pub async fn generate_clarifying_questions<M>(llm: &M, user_query: &str) -> ClarifyingQuestions
where
    M: LanguageModel,
{
    match llm
        .extract::<QuestionsModel>(SYSTEM_PROMPT, &user_prompt(user_query))
        .await
    {
        Ok(response) => {
            tracing::info!(count = response.questions.len(), "澄清问题生成完成");
            ClarifyingQuestions::Questions(response.questions)
        }
        Err(e) => {
            tracing::warn!(error = %e, "澄清问题生成失败，返回失败标记");
            ClarifyingQuestions::failed()
        }
    }
}
