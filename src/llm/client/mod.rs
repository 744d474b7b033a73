//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, LLMConfig, ModelSpec};
use crate::crew::{CompletionRequest, LanguageModel};
use crate::generator::request::Credentials;
use crate::llm::tools::web_search::AgentToolWebSearch;

mod providers;

use providers::ProviderClient;

/// LLM客户端 - 绑定一次请求的凭据与模型
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    model: ModelSpec,
    client: ProviderClient,
    web_search: Option<AgentToolWebSearch>,
}

impl LLMClient {
    /// 创建新的LLM客户端（不发起任何网络请求）
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Self> {
        let model = config.llm.resolve_model(credentials.model_identifier());
        let client = ProviderClient::new(model.provider, credentials.api_key.trim(), &config.llm)
            .with_context(|| format!("Failed to create {} client", model.provider))?;

        let web_search = credentials
            .search_key()
            .map(|key| AgentToolWebSearch::new(&config.search, key))
            .transpose()
            .context("Failed to create web search tool")?;

        Ok(Self {
            config: config.llm.clone(),
            model,
            client,
            web_search,
        })
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }

    pub fn has_web_search(&self) -> bool {
        self.web_search.is_some()
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let mut retries = 0;

        loop {
            let outcome = match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "model call timed out after {}s",
                    self.config.timeout_seconds
                )),
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt = retries,
                        max_attempts = max_retries,
                        error = %err,
                        "model call failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let web_search = if request.web_search {
            self.web_search.clone()
        } else {
            None
        };
        let use_tools = web_search.is_some();

        let agent = self.client.create_agent(
            &self.model.model,
            &request.system_prompt,
            &self.config,
            web_search,
        )?;

        tracing::debug!(
            provider = %self.model.provider,
            model = %self.model.model,
            use_tools,
            "calling model"
        );

        let max_turns = self.config.max_tool_turns;
        self.retry_with_backoff(|| async {
            if use_tools {
                agent
                    .multi_turn(&request.user_prompt, max_turns)
                    .await
                    .map_err(|e| anyhow!("model call with tools failed: {}", e))
            } else {
                agent.prompt(&request.user_prompt).await
            }
        })
        .await
    }
}

/// 按请求创建语言模型句柄
pub trait ModelFactory: Send + Sync {
    fn create(&self, credentials: &Credentials) -> Result<Arc<dyn LanguageModel>>;
}

/// 基于rig provider的默认工厂
#[derive(Debug, Clone)]
pub struct ProviderModelFactory {
    config: Config,
}

impl ProviderModelFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ModelFactory for ProviderModelFactory {
    fn create(&self, credentials: &Credentials) -> Result<Arc<dyn LanguageModel>> {
        let client = LLMClient::new(&self.config, credentials)?;
        tracing::info!(
            provider = %client.model().provider,
            model = %client.model().model,
            web_search = client.has_web_search(),
            "language model prepared"
        );
        Ok(Arc::new(client))
    }
}
