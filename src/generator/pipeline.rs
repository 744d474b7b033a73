use std::sync::Arc;

use crate::crew::{CrewError, CrewOutput, TaskRunner};
use crate::generator::request::{BlogRequest, ValidationError};
use crate::generator::templates::{Stage, build_blog_tasks};
use crate::llm::client::ModelFactory;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("failed to prepare language model: {0:#}")]
    ModelSetup(#[source] anyhow::Error),

    #[error("blog generation failed: {0}")]
    ExternalCall(#[from] CrewError),

    #[error("document export failed: {0:#}")]
    Export(#[source] anyhow::Error),
}

impl PipelineError {
    /// 是否为输入校验错误（未发生任何网络调用）
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }
}

/// 一次运行的产出
#[derive(Debug, Clone, PartialEq)]
pub struct BlogDraft {
    pub topic: String,
    /// 调研笔记
    pub research_notes: String,
    /// 写作任务的原始输出，用于展示与导出
    pub post: String,
    /// 编辑任务的审阅意见，仅供参考，不替代正文
    pub review: String,
}

impl BlogDraft {
    fn from_crew_output(topic: &str, output: &CrewOutput) -> Self {
        let raw = |stage: Stage| {
            output
                .task(stage.index())
                .map(|task| task.raw.clone())
                .unwrap_or_default()
        };

        Self {
            topic: topic.to_string(),
            research_notes: raw(Stage::Research),
            post: raw(Stage::Writing),
            review: raw(Stage::Editing),
        }
    }
}

/// 博客生成流水线：校验 -> 构建模型 -> 依次执行三个任务
#[derive(Clone)]
pub struct BlogPipeline {
    runner: Arc<dyn TaskRunner>,
    models: Arc<dyn ModelFactory>,
}

impl BlogPipeline {
    pub fn new(runner: Arc<dyn TaskRunner>, models: Arc<dyn ModelFactory>) -> Self {
        Self { runner, models }
    }

    /// 校验输入，失败时不会创建模型客户端
    pub fn validate(&self, request: &BlogRequest) -> Result<(), PipelineError> {
        request.validate().map_err(PipelineError::from)
    }

    /// 执行流水线，输入不合法时直接返回错误
    pub async fn run(&self, request: &BlogRequest) -> Result<BlogDraft, PipelineError> {
        self.validate(request)?;

        let llm = self
            .models
            .create(&request.credentials)
            .map_err(PipelineError::ModelSetup)?;

        let topic = request.topic();
        let tasks = build_blog_tasks(topic, llm);
        let output = self.runner.kickoff(tasks).await?;

        Ok(BlogDraft::from_crew_output(topic, &output))
    }
}
