// 调研报告生成流程
// 澄清（clarifier）：原始查询 → 3个澄清问题，失败时给出哨兵值
// 简报（combiner）：原始查询 + 用户问答 → 调研简报
// 规划（QueryPlanner）：调研简报 → 至多N条搜索查询
// 搜索（SearchExecutor）：搜索查询 → 过滤后的原始搜索结果
// 写作（ReportWriter）：原始查询 + 搜索结果 → markdown报告

pub mod agents;
pub mod combiner;
pub mod context;
pub mod orchestrator;
pub mod stage;
pub mod state;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
