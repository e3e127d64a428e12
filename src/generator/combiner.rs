use crate::generator::types::QAPair;

/// 原始查询与问答块之间的固定分隔标题
pub const QA_SECTION_HEADER: &str = "Clarifying questions and their answers:";

/// 把原始查询和澄清问答拼接为调研简报，问答保持输入顺序
pub fn combine(user_query: &str, qa_pairs: &[QAPair]) -> String {
    let qa_block: String = qa_pairs
        .iter()
        .map(|item| format!("Question: {}\nAnswer: {}\n", item.question, item.answer))
        .collect();

    format!("{}\n\n{}\n{}", user_query, QA_SECTION_HEADER, qa_block)
}
