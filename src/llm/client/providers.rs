//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
};

use crate::{
    config::{LLMConfig, LLMProvider},
    llm::tools::web_search::AgentToolWebSearch,
};

/// 按是否携带搜索工具完成Agent构建
macro_rules! finish_agent {
    ($builder:expr, $web_search:expr) => {
        match $web_search {
            Some(tool) => $builder.tool(tool).build(),
            None => $builder.build(),
        }
    };
}

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    Groq(rig::providers::groq::Client),
    OpenAI(rig::providers::openai::Client),
    DeepSeek(rig::providers::deepseek::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    /// 根据provider与请求中的API KEY创建相应的客户端
    pub fn new(provider: LLMProvider, api_key: &str, config: &LLMConfig) -> Result<Self> {
        let base_url = config.api_base_url.as_deref();

        match provider {
            LLMProvider::Groq => {
                let builder = rig::providers::groq::Client::builder(api_key);
                let client = match base_url {
                    Some(url) => builder.base_url(url).build(),
                    None => builder.build(),
                };
                Ok(ProviderClient::Groq(client))
            }
            LLMProvider::OpenAI => {
                let builder = rig::providers::openai::Client::builder(api_key);
                let client = match base_url {
                    Some(url) => builder.base_url(url).build(),
                    None => builder.build(),
                };
                Ok(ProviderClient::OpenAI(client))
            }
            LLMProvider::DeepSeek => {
                let builder = rig::providers::deepseek::Client::builder(api_key);
                let client = match base_url {
                    Some(url) => builder.base_url(url).build(),
                    None => builder.build(),
                };
                Ok(ProviderClient::DeepSeek(client))
            }
            LLMProvider::OpenRouter => {
                let client = rig::providers::openrouter::Client::builder(api_key).build();
                Ok(ProviderClient::OpenRouter(client))
            }
            LLMProvider::Anthropic => {
                let client = rig::providers::anthropic::ClientBuilder::new(api_key).build()?;
                Ok(ProviderClient::Anthropic(client))
            }
            LLMProvider::Gemini => {
                let client = rig::providers::gemini::Client::builder(api_key).build()?;
                Ok(ProviderClient::Gemini(client))
            }
            LLMProvider::Ollama => {
                let builder = rig::providers::ollama::Client::builder();
                let client = match base_url {
                    Some(url) => builder.base_url(url).build(),
                    None => builder.build(),
                };
                Ok(ProviderClient::Ollama(client))
            }
        }
    }

    /// 创建Agent，`web_search`不为空时挂载联网搜索工具
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
        web_search: Option<AgentToolWebSearch>,
    ) -> Result<ProviderAgent> {
        let agent = match self {
            ProviderClient::Groq(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature);
                ProviderAgent::Groq(finish_agent!(builder, web_search))
            }
            ProviderClient::OpenAI(client) => {
                let builder = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature);
                ProviderAgent::OpenAI(finish_agent!(builder, web_search))
            }
            ProviderClient::DeepSeek(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature);
                ProviderAgent::DeepSeek(finish_agent!(builder, web_search))
            }
            ProviderClient::OpenRouter(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(config.temperature);
                ProviderAgent::OpenRouter(finish_agent!(builder, web_search))
            }
            ProviderClient::Anthropic(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature);
                ProviderAgent::Anthropic(finish_agent!(builder, web_search))
            }
            ProviderClient::Gemini(client) => {
                let gen_cfg = GenerationConfig::default();
                let cfg = AdditionalParameters::default().with_config(gen_cfg);

                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .additional_params(serde_json::to_value(cfg)?);
                ProviderAgent::Gemini(finish_agent!(builder, web_search))
            }
            ProviderClient::Ollama(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature);
                ProviderAgent::Ollama(finish_agent!(builder, web_search))
            }
        };

        Ok(agent)
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    Groq(Agent<rig::providers::groq::CompletionModel<reqwest::Client>>),
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Gemini(Agent<rig::providers::gemini::completion::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::Groq(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::OpenRouter(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }

    /// 执行多轮对话（工具调用需要多轮）
    pub async fn multi_turn(
        &self,
        prompt: &str,
        max_iterations: usize,
    ) -> Result<String, PromptError> {
        match self {
            ProviderAgent::Groq(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::OpenRouter(agent) => {
                agent.prompt(prompt).multi_turn(max_iterations).await
            }
            ProviderAgent::Anthropic(agent) => {
                agent.prompt(prompt).multi_turn(max_iterations).await
            }
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
        }
    }
}
