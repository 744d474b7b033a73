//! 固定的Agent画像与任务模板：调研 -> 写作 -> 编辑

use std::fmt::Display;
use std::sync::Arc;

use crate::crew::{Agent, LanguageModel, Task};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Research,
    Writing,
    Editing,
}

impl Stage {
    /// 按执行顺序排列的全部阶段
    pub const ORDER: [Stage; 3] = [Stage::Research, Stage::Writing, Stage::Editing];

    /// 阶段在任务列表中的下标
    pub fn index(self) -> usize {
        match self {
            Stage::Research => 0,
            Stage::Writing => 1,
            Stage::Editing => 2,
        }
    }

    pub fn profile(self) -> &'static AgentProfile {
        match self {
            Stage::Research => &RESEARCHER,
            Stage::Writing => &BLOG_WRITER,
            Stage::Editing => &EDITOR,
        }
    }

    pub fn template(self) -> &'static TaskTemplate {
        match self {
            Stage::Research => &RESEARCH_TASK,
            Stage::Writing => &WRITING_TASK,
            Stage::Editing => &EDITING_TASK,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Stage::Research => "research",
            Stage::Writing => "write",
            Stage::Editing => "edit",
        };
        write!(f, "{}", str)
    }
}

/// Agent画像
#[derive(Debug)]
pub struct AgentProfile {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub web_search: bool,
}

/// 任务模板，描述中的`{topic}`会被替换为用户输入的主题
#[derive(Debug)]
pub struct TaskTemplate {
    pub description: &'static str,
    pub expected_output: &'static str,
}

impl TaskTemplate {
    pub fn render_description(&self, topic: &str) -> String {
        self.description.replace("{topic}", topic)
    }
}

pub static RESEARCHER: AgentProfile = AgentProfile {
    role: "Research Analyst",
    goal: "Gather structured and rich information about a topic for blogging",
    backstory: "Specializes in internet research and topic exploration, collecting all relevant background data and trending discussions.",
    web_search: true,
};

pub static BLOG_WRITER: AgentProfile = AgentProfile {
    role: "Blog Writer",
    goal: "Craft engaging and well-structured blog posts",
    backstory: "Expert at converting technical and research content into accessible blog articles. Skilled at storytelling and SEO-friendly writing.",
    web_search: false,
};

pub static EDITOR: AgentProfile = AgentProfile {
    role: "Editor and Content Enhancer",
    goal: "Review and polish the blog for clarity, grammar, flow, and value",
    backstory: "Experienced editor who ensures content is grammatically correct, logically structured, and enjoyable to read.",
    web_search: false,
};

pub static RESEARCH_TASK: TaskTemplate = TaskTemplate {
    description: "Research the topic: {topic}
- Provide background, recent trends, key stats, examples.
- Include references or quotes where useful.
- Focus on insights that could make a blog post informative and engaging.",
    expected_output: "Comprehensive notes with headings: Introduction, Trends, Examples, Insights, Data.",
};

pub static WRITING_TASK: TaskTemplate = TaskTemplate {
    description: "Write a blog post using the research:
- Catchy title and compelling intro
- Logical structure (Intro, Body, Conclusion)
- Use bullet points, examples, quotes
- Write in conversational and informative tone",
    expected_output: "Markdown blog post with title, intro, body sections, and conclusion. Format with headings and subheadings.",
};

pub static EDITING_TASK: TaskTemplate = TaskTemplate {
    description: "Review and enhance blog:
- Grammar, structure, style
- Add or suggest improvements
- Ensure readability and polish for publication",
    expected_output: "Reviewed markdown with edits, comments, or suggestions for clarity and better engagement.",
};

/// 为一次运行构建全新的Agent与任务，所有Agent共享同一个模型句柄
pub fn build_blog_tasks(topic: &str, llm: Arc<dyn LanguageModel>) -> Vec<Task> {
    Stage::ORDER
        .iter()
        .map(|stage| {
            let profile = stage.profile();
            let mut agent = Agent::new(profile.role, profile.goal, profile.backstory, llm.clone());
            if profile.web_search {
                agent = agent.with_web_search();
            }

            let template = stage.template();
            Task::new(
                template.render_description(topic),
                template.expected_output,
                Arc::new(agent),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::CompletionRequest;
    use async_trait::async_trait;

    struct NoopModel;

    #[async_trait]
    impl LanguageModel for NoopModel {
        async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_build_blog_tasks_order_and_profiles() {
        let llm: Arc<dyn LanguageModel> = Arc::new(NoopModel);
        let tasks = build_blog_tasks("Quantum Computing Basics", llm.clone());

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].agent.role, "Research Analyst");
        assert_eq!(tasks[1].agent.role, "Blog Writer");
        assert_eq!(tasks[2].agent.role, "Editor and Content Enhancer");

        assert!(tasks[0].description.starts_with("Research the topic: Quantum Computing Basics\n"));
        assert!(!tasks[1].description.contains("Quantum"));
        assert!(!tasks[2].description.contains("Quantum"));

        // 同一次运行共享同一个模型句柄
        for task in &tasks {
            assert!(Arc::ptr_eq(&task.agent.llm, &llm));
        }
    }

    #[test]
    fn test_only_researcher_searches() {
        let tasks = build_blog_tasks("Rust", Arc::new(NoopModel));

        assert!(tasks[0].agent.web_search);
        assert!(!tasks[1].agent.web_search);
        assert!(!tasks[2].agent.web_search);
    }

    #[test]
    fn test_fresh_descriptors_per_call() {
        let llm: Arc<dyn LanguageModel> = Arc::new(NoopModel);
        let first = build_blog_tasks("Rust", llm.clone());
        let second = build_blog_tasks("Rust", llm);

        for (a, b) in first.iter().zip(second.iter()) {
            assert!(!Arc::ptr_eq(&a.agent, &b.agent));
            assert_eq!(a.description, b.description);
        }
    }

    #[test]
    fn test_stage_index_matches_order() {
        for (i, stage) in Stage::ORDER.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        assert_eq!(Stage::Writing.to_string(), "write");
    }
}
