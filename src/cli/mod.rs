use crate::config::{Config, LLMProvider};
use crate::generator::request::{BlogRequest, Credentials};
use anyhow::{Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// blogwright - 调研、写作、编辑三个智能体协作生成博客草稿
#[derive(Parser, Debug)]
#[command(name = "blogwright")]
#[command(
    about = "AI blog writer: a researcher, a writer and an editor agent draft a complete blog post on any topic and export it as a Word document."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 生成一篇博客并导出Word文档
    Generate(GenerateArgs),
    /// 启动单页Web界面
    Serve(ServeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// 博客主题
    #[arg(short, long)]
    pub topic: String,

    /// LLM API KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// 联网搜索 API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 模型标识，支持 provider/model 写法
    #[arg(short, long)]
    pub model: Option<String>,

    /// LLM Provider (groq, openai, deepseek, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 输出目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 导出文件名
    #[arg(long)]
    pub file_name: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    /// 监听地址
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl Args {
    /// 加载配置文件并用CLI参数覆盖
    pub fn into_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if self.verbose {
            config.verbose = true;
        }

        match &self.command {
            Command::Generate(generate) => generate.apply(&mut config)?,
            Command::Serve(serve) => {
                if let Some(bind) = &serve.bind {
                    config.server.bind = bind.clone();
                }
            }
        }

        Ok(config)
    }
}

impl GenerateArgs {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(provider_str) = &self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = Some(llm_api_base_url.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if let Some(file_name) = &self.file_name {
            config.export.file_name = file_name.clone();
        }
        Ok(())
    }

    /// 转换为一次生成请求
    pub fn to_request(&self) -> BlogRequest {
        let credentials = Credentials {
            api_key: self.api_key.clone().unwrap_or_default(),
            search_api_key: self.search_api_key.clone(),
            model: self.model.clone(),
        };
        BlogRequest::new(credentials, self.topic.clone())
    }
}
