//! 联网搜索工具（Serper兼容接口）

use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;

/// 联网搜索工具
#[derive(Debug, Clone)]
pub struct AgentToolWebSearch {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_results: u32,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
    pub max_results: Option<u32>,
}

/// 单条搜索结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// 搜索结果
#[derive(Debug, Serialize, PartialEq)]
pub struct WebSearchResult {
    pub query: String,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchToolError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("query must not be empty")]
    EmptyQuery,
}

impl AgentToolWebSearch {
    pub fn new(config: &SearchConfig, api_key: &str) -> Result<Self, SearchToolError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            max_results: config.max_results,
        })
    }

    async fn search(&self, args: &WebSearchArgs) -> Result<WebSearchResult, SearchToolError> {
        let query = args.query.trim();
        if query.is_empty() {
            return Err(SearchToolError::EmptyQuery);
        }
        let num = args
            .max_results
            .unwrap_or(self.max_results)
            .clamp(1, self.max_results.max(1));

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": num }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchToolError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SerperResponse = response.json().await?;
        let results = payload.organic.into_iter().take(num as usize).collect();

        Ok(WebSearchResult {
            query: query.to_string(),
            results,
        })
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = SearchToolError;
    type Args = WebSearchArgs;
    type Output = WebSearchResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web for up-to-date information. Returns result titles, links and snippets.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query."
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to return."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::debug!(query = %args.query, "tool called: web_search");
        self.search(&args).await
    }
}
