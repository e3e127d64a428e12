use std::collections::HashSet;
use std::fmt;

use crate::generator::types::WorkflowError;
use crate::search::SearchRecord;

/// 调研流程阶段：Planning → Searching → Writing → Done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResearchPhase {
    Planning,
    Searching,
    Writing,
    Done,
}

impl ResearchPhase {
    /// 线性流转，Done为终态
    pub fn next(self) -> Self {
        match self {
            ResearchPhase::Planning => ResearchPhase::Searching,
            ResearchPhase::Searching => ResearchPhase::Writing,
            ResearchPhase::Writing | ResearchPhase::Done => ResearchPhase::Done,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ResearchPhase::Done
    }
}

impl fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResearchPhase::Planning => write!(f, "planning"),
            ResearchPhase::Searching => write!(f, "searching"),
            ResearchPhase::Writing => write!(f, "writing"),
            ResearchPhase::Done => write!(f, "done"),
        }
    }
}

/// 阶段产出的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    SearchQueries,
    SearchResults,
    FinalReport,
}

impl StateField {
    pub fn name(self) -> &'static str {
        match self {
            StateField::SearchQueries => "search_queries",
            StateField::SearchResults => "search_results",
            StateField::FinalReport => "final_report",
        }
    }
}

/// 单个阶段对状态的局部更新
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    SearchQueries(Vec<String>),
    SearchResults(Vec<SearchRecord>),
    FinalReport(String),
}

impl StateUpdate {
    pub fn field(&self) -> StateField {
        match self {
            StateUpdate::SearchQueries(_) => StateField::SearchQueries,
            StateUpdate::SearchResults(_) => StateField::SearchResults,
            StateUpdate::FinalReport(_) => StateField::FinalReport,
        }
    }
}

/// 单次请求内的调研状态，每个产出字段只允许写入一次
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchState {
    user_query: String,
    combined_query_context: String,
    search_queries: Vec<String>,
    search_results: Vec<SearchRecord>,
    final_report: String,
    written: HashSet<StateField>,
}

impl ResearchState {
    pub fn new(user_query: impl Into<String>, combined_query_context: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            combined_query_context: combined_query_context.into(),
            ..Self::default()
        }
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn combined_query_context(&self) -> &str {
        &self.combined_query_context
    }

    pub fn search_queries(&self) -> &[String] {
        &self.search_queries
    }

    pub fn search_results(&self) -> &[SearchRecord] {
        &self.search_results
    }

    pub fn final_report(&self) -> &str {
        &self.final_report
    }

    pub fn is_written(&self, field: StateField) -> bool {
        self.written.contains(&field)
    }

    /// 按字段名浅合并阶段产出，得到新的状态
    pub fn merge(mut self, update: StateUpdate) -> Result<Self, WorkflowError> {
        let field = update.field();
        if !self.written.insert(field) {
            return Err(WorkflowError::FieldAlreadyWritten(field.name()));
        }

        match update {
            StateUpdate::SearchQueries(queries) => self.search_queries = queries,
            StateUpdate::SearchResults(results) => self.search_results = results,
            StateUpdate::FinalReport(report) => self.final_report = report,
        }
        Ok(self)
    }

    /// 取出对外可见的唯一结果
    pub fn into_final_report(self) -> String {
        self.final_report
    }
}
