#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::crew::{CompletionRequest, LanguageModel, SequentialCrew};
    use crate::generator::pipeline::PipelineError;
    use crate::generator::request::{BlogRequest, Credentials};
    use crate::generator::workflow::{BlogWorkflow, PhaseTracker, RunPhase};
    use crate::llm::client::ModelFactory;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StageModel {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LanguageModel for StageModel {
        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("invalid api key"));
            }
            let role = request
                .system_prompt
                .trim_start_matches("You are ")
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string();
            Ok(format!("# {role}\n\nWritten by {role}\n"))
        }
    }

    struct Factory(Arc<StageModel>);

    impl ModelFactory for Factory {
        fn create(&self, _credentials: &Credentials) -> anyhow::Result<Arc<dyn LanguageModel>> {
            Ok(self.0.clone())
        }
    }

    fn workflow(fail: bool) -> (BlogWorkflow, Arc<StageModel>) {
        let model = Arc::new(StageModel {
            calls: AtomicUsize::new(0),
            fail,
        });
        let workflow = BlogWorkflow::new(
            Config::default(),
            Arc::new(SequentialCrew::new()),
            Arc::new(Factory(model.clone())),
        );
        (workflow, model)
    }

    #[tokio::test]
    async fn test_workflow_success_phases() {
        let (workflow, model) = workflow(false);
        let request = BlogRequest::new(Credentials::new("gsk_key"), "Quantum Computing Basics");

        let report = workflow.execute(&request).await.unwrap();

        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            report.phases,
            vec![
                RunPhase::Idle,
                RunPhase::ValidatingInput,
                RunPhase::RunningPipeline,
                RunPhase::RenderingOutput,
                RunPhase::Done,
            ]
        );
        assert_eq!(report.draft.post, "# Blog Writer\n\nWritten by Blog Writer\n");
        assert_eq!(report.document.paragraph_count, 4);
        assert_eq!(report.document.file_name, "Generated_Blog.docx");
        assert!(report.timing_report.contains("running_pipeline"));

        std::fs::remove_file(&report.document.path).unwrap();
    }

    #[tokio::test]
    async fn test_workflow_validation_error() {
        let (workflow, model) = workflow(false);
        let request = BlogRequest::new(Credentials::new(""), "Rust");

        let err = workflow.execute(&request).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_workflow_external_error() {
        let (workflow, model) = workflow(true);
        let request = BlogRequest::new(Credentials::new("bad"), "Rust");

        let err = workflow.execute(&request).await.unwrap_err();

        assert!(matches!(err, PipelineError::ExternalCall(_)));
        assert!(err.to_string().contains("invalid api key"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_phase_tracker_records_durations() {
        let mut tracker = PhaseTracker::new("run");
        assert_eq!(tracker.current(), RunPhase::Idle);

        tracker.advance(RunPhase::ValidatingInput);
        tracker.advance(RunPhase::Error);

        assert_eq!(tracker.current(), RunPhase::Error);
        assert_eq!(
            tracker.history(),
            &[RunPhase::Idle, RunPhase::ValidatingInput, RunPhase::Error]
        );
        // Idle不计时
        assert_eq!(tracker.get_phase_durations().len(), 1);
        assert_eq!(tracker.get_phase_durations()[0].0, RunPhase::ValidatingInput);
        assert!(tracker.generate_timing_report().starts_with("Total time:"));
    }
}
