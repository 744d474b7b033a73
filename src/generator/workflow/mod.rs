use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::crew::{SequentialCrew, TaskRunner};
use crate::generator::outlet::{DocxOutlet, ExportedDocument, Outlet};
use crate::generator::pipeline::{BlogDraft, BlogPipeline, PipelineError};
use crate::generator::request::BlogRequest;
use crate::llm::client::{ModelFactory, ProviderModelFactory};

/// 一次运行所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    ValidatingInput,
    RunningPipeline,
    RenderingOutput,
    Done,
    Error,
}

impl Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            RunPhase::Idle => "idle",
            RunPhase::ValidatingInput => "validating_input",
            RunPhase::RunningPipeline => "running_pipeline",
            RunPhase::RenderingOutput => "rendering_output",
            RunPhase::Done => "done",
            RunPhase::Error => "error",
        };
        write!(f, "{}", str)
    }
}

/// 阶段跟踪：记录阶段序列与各阶段耗时
#[derive(Debug)]
pub struct PhaseTracker {
    run_id: String,
    start_time: Instant,
    current: RunPhase,
    phase_started: Instant,
    history: Vec<RunPhase>,
    phase_durations: Vec<(RunPhase, Duration)>,
}

impl PhaseTracker {
    pub fn new(run_id: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            run_id: run_id.into(),
            start_time: now,
            current: RunPhase::Idle,
            phase_started: now,
            history: vec![RunPhase::Idle],
            phase_durations: Vec::new(),
        }
    }

    pub fn current(&self) -> RunPhase {
        self.current
    }

    /// 进入下一个阶段，结束当前阶段的计时
    pub fn advance(&mut self, next: RunPhase) {
        let elapsed = self.phase_started.elapsed();
        if self.current != RunPhase::Idle {
            self.phase_durations.push((self.current, elapsed));
        }

        tracing::debug!(
            run_id = %self.run_id,
            from = %self.current,
            to = %next,
            "phase transition"
        );

        self.current = next;
        self.phase_started = Instant::now();
        self.history.push(next);
    }

    pub fn history(&self) -> &[RunPhase] {
        &self.history
    }

    pub fn get_phase_durations(&self) -> &[(RunPhase, Duration)] {
        &self.phase_durations
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "Total time: {:.2}s\n",
            self.get_total_duration().as_secs_f64()
        );
        for (phase, duration) in &self.phase_durations {
            report.push_str(&format!("- {}: {:.3}s\n", phase, duration.as_secs_f64()));
        }
        report
    }
}

/// 成功运行的结果
#[derive(Debug)]
pub struct BlogReport {
    pub run_id: String,
    pub draft: BlogDraft,
    pub document: ExportedDocument,
    pub phases: Vec<RunPhase>,
    pub timing_report: String,
}

/// 完整工作流：校验 -> 执行流水线 -> 渲染导出
#[derive(Clone)]
pub struct BlogWorkflow {
    pipeline: BlogPipeline,
    config: Arc<Config>,
}

impl BlogWorkflow {
    pub fn new(config: Config, runner: Arc<dyn TaskRunner>, models: Arc<dyn ModelFactory>) -> Self {
        Self {
            pipeline: BlogPipeline::new(runner, models),
            config: Arc::new(config),
        }
    }

    /// 使用rig provider与顺序执行器的默认工作流
    pub fn from_config(config: Config) -> Self {
        let models = Arc::new(ProviderModelFactory::new(config.clone()));
        Self::new(config, Arc::new(SequentialCrew::new()), models)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn execute(&self, request: &BlogRequest) -> Result<BlogReport, PipelineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut tracker = PhaseTracker::new(run_id.clone());

        let result = self.execute_phases(request, &run_id, &mut tracker).await;
        match result {
            Ok((draft, document)) => {
                tracker.advance(RunPhase::Done);
                tracing::info!(
                    run_id = %run_id,
                    total_ms = tracker.get_total_duration().as_millis() as u64,
                    "blog generation finished"
                );
                Ok(BlogReport {
                    run_id,
                    draft,
                    document,
                    phases: tracker.history().to_vec(),
                    timing_report: tracker.generate_timing_report(),
                })
            }
            Err(err) => {
                let failed_in = tracker.current();
                tracker.advance(RunPhase::Error);
                if err.is_validation() {
                    tracing::info!(run_id = %run_id, "input rejected: {}", err);
                } else {
                    tracing::error!(run_id = %run_id, phase = %failed_in, "run failed: {}", err);
                }
                Err(err)
            }
        }
    }

    async fn execute_phases(
        &self,
        request: &BlogRequest,
        run_id: &str,
        tracker: &mut PhaseTracker,
    ) -> Result<(BlogDraft, ExportedDocument), PipelineError> {
        tracker.advance(RunPhase::ValidatingInput);
        self.pipeline.validate(request)?;

        tracker.advance(RunPhase::RunningPipeline);
        tracing::info!(run_id = %run_id, topic = %request.topic(), "blog generation started");
        let draft = self.pipeline.run(request).await?;

        tracker.advance(RunPhase::RenderingOutput);
        let outlet = DocxOutlet::new(self.config.export.clone())
            .with_temp_prefix(format!("blogwright-{}-", &run_id[..8]));
        let document = outlet.save(&draft).await.map_err(PipelineError::Export)?;

        Ok((draft, document))
    }
}

// Include tests
#[cfg(test)]
mod tests;
