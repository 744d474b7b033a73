use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "blogwright.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LLMProvider {
    #[serde(rename = "groq")]
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Groq => write!(f, "groq"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LLMProvider::Groq),
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 模型标识，支持 `provider/model` 写法，例如 `groq/gemma2-9b-it`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub provider: LLMProvider,
    pub model: String,
}

impl ModelSpec {
    /// 解析模型标识。前缀不是已知provider时，整个字符串视为模型名，使用`fallback_provider`
    pub fn parse(identifier: &str, fallback_provider: LLMProvider) -> Self {
        let identifier = identifier.trim();
        if let Some((prefix, rest)) = identifier.split_once('/')
            && !rest.is_empty()
            && let Ok(provider) = prefix.parse::<LLMProvider>()
        {
            return Self {
                provider,
                model: rest.to_string(),
            };
        }

        Self {
            provider: fallback_provider,
            model: identifier.to_string(),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 联网搜索配置
    pub search: SearchConfig,

    /// 文档导出配置
    pub export: ExportConfig,

    /// Web界面配置
    pub server: ServerConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// 请求中未指定模型时使用的默认模型
    pub model: String,

    /// LLM API基地址，为空时使用provider默认地址
    pub api_base_url: Option<String>,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 尝试次数（1表示不重试）
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 使用工具时的最大对话轮数
    pub max_tool_turns: usize,
}

/// 联网搜索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 搜索接口地址
    pub endpoint: String,

    /// 每次搜索返回的最大结果数
    pub max_results: u32,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 文档导出配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// 下载文件名
    pub file_name: String,

    /// CLI模式下的输出目录
    pub output_dir: PathBuf,
}

/// Web界面配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 加载配置：优先使用显式路径，其次当前目录下的默认配置文件，否则使用默认值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// 导出文件在CLI模式下的目标路径
    pub fn export_target(&self) -> PathBuf {
        self.export.output_dir.join(&self.export.file_name)
    }
}

impl LLMConfig {
    /// 根据请求中的模型标识确定最终使用的provider与模型
    pub fn resolve_model(&self, requested: Option<&str>) -> ModelSpec {
        match requested.map(str::trim).filter(|m| !m.is_empty()) {
            Some(identifier) => ModelSpec::parse(identifier, self.provider),
            None => ModelSpec::parse(&self.model, self.provider),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            model: String::from("gemma2-9b-it"),
            api_base_url: None,
            max_tokens: 4096,
            temperature: 0.7,
            retry_attempts: 1,
            retry_delay_ms: 2000,
            timeout_seconds: 180,
            max_tool_turns: 5,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://google.serper.dev/search"),
            max_results: 5,
            timeout_seconds: 15,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: String::from("Generated_Blog.docx"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::from("127.0.0.1:8501"),
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
