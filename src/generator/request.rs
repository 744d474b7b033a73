use std::fmt;

/// 用户在一次交互中输入的凭据
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// LLM API KEY
    pub api_key: String,
    /// 联网搜索 API KEY
    pub search_api_key: Option<String>,
    /// 模型标识
    pub model: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_search_api_key(mut self, key: impl Into<String>) -> Self {
        self.search_api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// 非空的搜索 API KEY
    pub fn search_key(&self) -> Option<&str> {
        self.search_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// 非空的模型标识
    pub fn model_identifier(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }
}

fn redact(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field(
                "search_api_key",
                &self.search_api_key.as_deref().map(redact),
            )
            .field("model", &self.model)
            .finish()
    }
}

/// 一次生成请求：凭据加主题，仅在本次请求内有效
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogRequest {
    pub credentials: Credentials,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter both the API key and topic.")]
    MissingInput { api_key: bool, topic: bool },
}

impl BlogRequest {
    pub fn new(credentials: Credentials, topic: impl Into<String>) -> Self {
        Self {
            credentials,
            topic: topic.into(),
        }
    }

    /// 去除首尾空白后的主题
    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    /// 校验必填项：API KEY与主题均不能为空
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.credentials.api_key.trim().is_empty();
        let topic = self.topic().is_empty();

        if api_key || topic {
            return Err(ValidationError::MissingInput { api_key, topic });
        }
        Ok(())
    }
}
