#[cfg(test)]
mod tests {
    use crate::config::{Config, ExportConfig, LLMConfig, LLMProvider, ModelSpec};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.export.file_name, "Generated_Blog.docx");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.search.endpoint, "https://google.serper.dev/search");
        assert_eq!(config.search.max_results, 5);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_default() {
        let provider = LLMProvider::default();
        assert_eq!(provider, LLMProvider::Groq);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("groq".parse::<LLMProvider>().unwrap(), LLMProvider::Groq);
        assert_eq!(
            "OpenAI".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "gemini".parse::<LLMProvider>().unwrap(),
            LLMProvider::Gemini
        );
        assert_eq!(
            "ollama".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display_round_trips() {
        for provider in [
            LLMProvider::Groq,
            LLMProvider::OpenAI,
            LLMProvider::DeepSeek,
            LLMProvider::OpenRouter,
            LLMProvider::Anthropic,
            LLMProvider::Gemini,
            LLMProvider::Ollama,
        ] {
            assert_eq!(
                provider.to_string().parse::<LLMProvider>().unwrap(),
                provider
            );
        }
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::Groq);
        assert_eq!(config.model, "gemma2-9b-it");
        assert!(config.api_base_url.is_none());
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 0.7);
        // 默认只调用一次，不重试
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.timeout_seconds, 180);
        assert_eq!(config.max_tool_turns, 5);
    }

    #[test]
    fn test_model_spec_with_provider_prefix() {
        let spec = ModelSpec::parse("groq/gemma2-9b-it", LLMProvider::OpenAI);
        assert_eq!(spec.provider, LLMProvider::Groq);
        assert_eq!(spec.model, "gemma2-9b-it");

        let spec = ModelSpec::parse("openai/gpt-4o-mini", LLMProvider::Groq);
        assert_eq!(spec.provider, LLMProvider::OpenAI);
        assert_eq!(spec.model, "gpt-4o-mini");
    }

    #[test]
    fn test_model_spec_unknown_prefix_keeps_full_name() {
        // openrouter风格的模型名本身带有斜杠
        let spec = ModelSpec::parse("meta-llama/llama-3.1-8b", LLMProvider::OpenRouter);
        assert_eq!(spec.provider, LLMProvider::OpenRouter);
        assert_eq!(spec.model, "meta-llama/llama-3.1-8b");

        let spec = ModelSpec::parse("  llama3  ", LLMProvider::Ollama);
        assert_eq!(spec.model, "llama3");
    }

    #[test]
    fn test_resolve_model_prefers_request() {
        let config = LLMConfig::default();

        let spec = config.resolve_model(Some("llama-3.3-70b-versatile"));
        assert_eq!(spec.provider, LLMProvider::Groq);
        assert_eq!(spec.model, "llama-3.3-70b-versatile");

        let spec = config.resolve_model(Some("   "));
        assert_eq!(spec.model, "gemma2-9b-it");

        let spec = config.resolve_model(None);
        assert_eq!(spec.model, "gemma2-9b-it");
    }

    #[test]
    fn test_from_file_partial_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blogwright.toml");
        std::fs::write(
            &path,
            r#"verbose = true

[llm]
provider = "openai"
model = "gpt-4o-mini"
api_base_url = "https://api.openai.com/v1"

[export]
output_dir = "out"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(
            config.llm.api_base_url.as_deref(),
            Some("https://api.openai.com/v1")
        );
        // 未写入的字段保持默认值
        assert_eq!(config.llm.retry_attempts, 1);
        assert_eq!(config.export.file_name, "Generated_Blog.docx");
        assert_eq!(config.export_target(), PathBuf::from("out/Generated_Blog.docx"));
        assert_eq!(config.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/blogwright.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[llm\nprovider = ").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_export_target() {
        let config = Config {
            export: ExportConfig {
                file_name: "post.docx".to_string(),
                output_dir: PathBuf::from("/tmp/blogs"),
            },
            ..Default::default()
        };

        assert_eq!(config.export_target(), PathBuf::from("/tmp/blogs/post.docx"));
    }
}
