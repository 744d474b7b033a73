//! 多智能体顺序执行 - Agent/Task描述与可替换的任务执行器

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

mod executor;

pub use executor::SequentialCrew;

/// 发送给语言模型的一次完整请求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// 系统提示词（由Agent的角色、背景与目标生成）
    pub system_prompt: String,
    /// 用户提示词（任务描述、产出要求与上下文）
    pub user_prompt: String,
    /// 该Agent是否允许使用联网搜索工具
    pub web_search: bool,
}

/// 语言模型调用接口，同一次运行中的所有Agent共享同一个实现
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}

/// Agent描述：角色绑定的配置加上共享的语言模型句柄
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub web_search: bool,
    pub llm: Arc<dyn LanguageModel>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            web_search: false,
            llm,
        }
    }

    /// 允许该Agent使用联网搜索
    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    /// 生成该Agent的系统提示词
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("backstory", &self.backstory)
            .field("web_search", &self.web_search)
            .finish_non_exhaustive()
    }
}

/// 任务描述
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<Agent>,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
        }
    }
}

/// 单个任务的产出
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub description: String,
    pub agent_role: String,
    pub raw: String,
}

/// 一次执行的全部产出，顺序与提交的任务列表一致
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewOutput {
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// 最后一个任务的原始输出
    pub fn raw(&self) -> &str {
        self.tasks_output
            .last()
            .map(|output| output.raw.as_str())
            .unwrap_or_default()
    }

    pub fn task(&self, index: usize) -> Option<&TaskOutput> {
        self.tasks_output.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks_output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks_output.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("no tasks were submitted")]
    NoTasks,

    #[error("task {index} ({role}) failed: {source:#}")]
    TaskFailed {
        /// 从1开始的任务序号
        index: usize,
        role: String,
        #[source]
        source: anyhow::Error,
    },
}

/// 任务执行器：按顺序执行任务列表并返回有序的产出
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn kickoff(&self, tasks: Vec<Task>) -> Result<CrewOutput, CrewError>;
}
