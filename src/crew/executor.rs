use async_trait::async_trait;

use super::{CompletionRequest, CrewError, CrewOutput, Task, TaskOutput, TaskRunner};

/// 多个任务产出之间的分隔符
const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

/// 顺序执行器：按列表顺序逐个执行任务，前序任务的产出作为后续任务的上下文
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialCrew;

impl SequentialCrew {
    pub fn new() -> Self {
        Self
    }

    /// 构建任务的用户提示词
    pub fn build_task_prompt(task: &Task, context: &str) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\nYou MUST return the actual complete content as the final answer, not a summary.",
            task.description, task.expected_output
        );

        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(context);
        }

        prompt
    }

    fn aggregate_context(outputs: &[TaskOutput]) -> String {
        outputs
            .iter()
            .map(|output| output.raw.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DIVIDER)
    }
}

#[async_trait]
impl TaskRunner for SequentialCrew {
    async fn kickoff(&self, tasks: Vec<Task>) -> Result<CrewOutput, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        let total = tasks.len();
        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(total);

        for (i, task) in tasks.into_iter().enumerate() {
            let index = i + 1;
            let agent = &task.agent;
            let context = Self::aggregate_context(&tasks_output);

            let request = CompletionRequest {
                system_prompt: agent.system_prompt(),
                user_prompt: Self::build_task_prompt(&task, &context),
                web_search: agent.web_search,
            };

            tracing::info!(task = index, total, role = %agent.role, "task started");
            let started = std::time::Instant::now();

            let raw = agent
                .llm
                .complete(&request)
                .await
                .map_err(|source| CrewError::TaskFailed {
                    index,
                    role: agent.role.clone(),
                    source,
                })?;

            tracing::info!(
                task = index,
                role = %agent.role,
                elapsed_ms = started.elapsed().as_millis() as u64,
                output_chars = raw.chars().count(),
                "task finished"
            );

            tasks_output.push(TaskOutput {
                description: task.description.clone(),
                agent_role: agent.role.clone(),
                raw,
            });
        }

        Ok(CrewOutput { tasks_output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::{Agent, LanguageModel};
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    /// 记录请求并按顺序返回预设回复的模型
    #[derive(Default)]
    struct ScriptedModel {
        replies: Mutex<Vec<anyhow::Result<String>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
            let mut replies = replies;
            replies.reverse();
            Arc::new(Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
        }
    }

    fn task(name: &str, llm: Arc<dyn LanguageModel>) -> Task {
        let agent = Agent::new(
            format!("{} role", name),
            format!("{} goal", name),
            format!("{} backstory", name),
            llm,
        );
        Task::new(
            format!("{} description", name),
            format!("{} expected", name),
            Arc::new(agent),
        )
    }

    #[tokio::test]
    async fn test_runs_tasks_in_order_with_context() {
        let model = ScriptedModel::new(vec![
            Ok("first out".to_string()),
            Ok("second out".to_string()),
            Ok("third out".to_string()),
        ]);
        let llm: Arc<dyn LanguageModel> = model.clone();
        let tasks = vec![task("a", llm.clone()), task("b", llm.clone()), task("c", llm)];

        let output = SequentialCrew::new().kickoff(tasks).await.unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output.task(0).unwrap().raw, "first out");
        assert_eq!(output.task(1).unwrap().agent_role, "b role");
        assert_eq!(output.raw(), "third out");

        let requests = model.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0].system_prompt,
            "You are a role. a backstory\nYour personal goal is: a goal"
        );
        assert!(requests[0].user_prompt.starts_with("a description"));
        assert!(requests[0].user_prompt.contains("a expected"));
        assert!(!requests[0].user_prompt.contains("context you're working with"));

        assert!(requests[1].user_prompt.contains("first out"));
        assert!(requests[2].user_prompt.contains("first out\n\n----------\n\nsecond out"));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let model = ScriptedModel::new(vec![
            Ok("first out".to_string()),
            Err(anyhow!("401 unauthorized")),
            Ok("never".to_string()),
        ]);
        let llm: Arc<dyn LanguageModel> = model.clone();
        let tasks = vec![task("a", llm.clone()), task("b", llm.clone()), task("c", llm)];

        let err = SequentialCrew::new().kickoff(tasks).await.unwrap_err();

        match &err {
            CrewError::TaskFailed { index, role, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(role, "b role");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("401 unauthorized"));
        assert_eq!(model.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_task_list() {
        let err = SequentialCrew::new().kickoff(Vec::new()).await.unwrap_err();
        assert!(matches!(err, CrewError::NoTasks));
    }

    #[tokio::test]
    async fn test_web_search_flag_follows_agent() {
        let model = ScriptedModel::new(vec![Ok("x".to_string()), Ok("y".to_string())]);
        let llm: Arc<dyn LanguageModel> = model.clone();
        let searching = Agent::new("r", "g", "b", llm.clone()).with_web_search();
        let tasks = vec![
            Task::new("d1", "e1", Arc::new(searching)),
            task("plain", llm),
        ];

        SequentialCrew::new().kickoff(tasks).await.unwrap();

        let requests = model.requests();
        assert!(requests[0].web_search);
        assert!(!requests[1].web_search);
    }

    #[test]
    fn test_crew_output_raw_on_empty() {
        let output = CrewOutput::default();
        assert!(output.is_empty());
        assert_eq!(output.raw(), "");
        assert!(output.task(1).is_none());
    }
}
