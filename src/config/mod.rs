use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 搜索深度
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Basic => write!(f, "basic"),
            SearchDepth::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            _ => Err(format!("Unknown search depth: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// HTTP服务配置
    pub server: ServerConfig,

    /// 调研流程配置
    pub workflow: WorkflowConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，仅OpenAI兼容类provider生效，None时使用provider默认地址
    pub api_base_url: Option<String>,

    /// 模型标识
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 首次调用失败后的额外重试次数
    pub max_retries: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒），None表示不设超时
    pub timeout_seconds: Option<u64>,
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API KEY
    pub api_key: String,

    /// Tavily API基地址
    pub api_base_url: String,

    /// 搜索主题
    pub topic: String,

    /// 搜索深度
    pub search_depth: SearchDepth,

    /// 每条查询返回的最大结果数
    pub max_results: u32,

    /// 是否返回网页原文
    pub include_raw_content: bool,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,

    /// 监听端口
    pub port: u16,

    /// 允许跨域访问的前端地址
    pub allowed_origins: Vec<String>,
}

/// 调研流程配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WorkflowConfig {
    /// 规划阶段向模型索要的搜索查询上限（仅作为提示，不做截断）
    pub max_queries: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 服务监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 未设置 RUST_LOG 时的默认日志级别
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DEEPREPORT_LLM_API_KEY").unwrap_or_default(),
            api_base_url: None,
            model: String::from("gemini-2.0-flash-001"),
            max_tokens: 8192,
            temperature: 0.0,
            max_retries: 2,
            retry_delay_ms: 1000,
            timeout_seconds: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("DEEPREPORT_TAVILY_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.tavily.com"),
            topic: String::from("general"),
            search_depth: SearchDepth::default(),
            max_results: 5,
            include_raw_content: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8000,
            allowed_origins: vec![String::from("http://localhost:5173")],
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { max_queries: 8 }
    }
}
