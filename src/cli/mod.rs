use crate::config::{Config, LLMProvider, SearchDepth};
use crate::generator::types::{QAPair, ReportQuery};
use anyhow::{Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "deepreport.toml";

/// DeepReport-RS - 澄清问题、规划搜索、综合成文的调研报告生成服务
#[derive(Parser, Debug)]
#[command(name = "deepreport-rs")]
#[command(
    about = "Research-report generation backend: asks clarifying questions, plans web searches, runs them and synthesizes a cited markdown report."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// 监听端口
    #[arg(short, long)]
    pub port: Option<u16>,

    /// LLM Provider (openai, anthropic, deepseek, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型标识
    #[arg(short, long)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 模型调用失败后的重试次数
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// 单次模型调用超时（秒）
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Tavily API KEY
    #[arg(long)]
    pub tavily_api_key: Option<String>,

    /// 搜索深度 (basic, advanced)
    #[arg(long)]
    pub search_depth: Option<String>,

    /// 每条查询的最大结果数
    #[arg(long)]
    pub max_results: Option<u32>,

    /// 向模型索要的搜索查询上限
    #[arg(long)]
    pub max_queries: Option<usize>,

    /// 一次性模式：直接为该查询生成报告并输出，不启动HTTP服务
    #[arg(short, long)]
    pub query: Option<String>,

    /// 一次性模式下的澄清问答，格式为 "问题=回答"，可重复
    #[arg(long = "qa", value_name = "QUESTION=ANSWER")]
    pub qa: Vec<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 解析一次性报告请求
    pub fn report_request(&self) -> Result<Option<ReportQuery>> {
        let Some(user_query) = &self.query else {
            if !self.qa.is_empty() {
                return Err(anyhow!("--qa requires --query"));
            }
            return Ok(None);
        };

        let qa_list = self
            .qa
            .iter()
            .map(|item| {
                item.split_once('=')
                    .map(|(question, answer)| QAPair::new(question.trim(), answer.trim()))
                    .ok_or_else(|| anyhow!("invalid --qa value {:?}, expected QUESTION=ANSWER", item))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ReportQuery {
            user_query: user_query.clone(),
            qa_list,
        }))
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path)?
            } else {
                Config::default()
            }
        };

        // 服务配置
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => tracing::warn!(
                    provider = %provider_str,
                    "未知的provider，使用默认provider"
                ),
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = Some(llm_api_base_url);
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(max_retries) = self.max_retries {
            config.llm.max_retries = max_retries;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.llm.timeout_seconds = Some(timeout_seconds);
        }

        // 搜索配置
        if let Some(tavily_api_key) = self.tavily_api_key {
            config.search.api_key = tavily_api_key;
        }
        if let Some(depth_str) = self.search_depth {
            match depth_str.parse::<SearchDepth>() {
                Ok(depth) => config.search.search_depth = depth,
                Err(_) => tracing::warn!(
                    search_depth = %depth_str,
                    "未知的搜索深度，使用默认值"
                ),
            }
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }

        if let Some(max_queries) = self.max_queries {
            config.workflow.max_queries = max_queries;
        }

        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
