//! 单页Web界面

use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generator::pipeline::PipelineError;
use crate::generator::request::{BlogRequest, Credentials};
use crate::generator::workflow::BlogWorkflow;

pub mod page;

use page::{FormValues, PageBody, render_page};

#[derive(Clone)]
pub struct AppState {
    workflow: BlogWorkflow,
}

impl AppState {
    pub fn new(workflow: BlogWorkflow) -> Self {
        Self { workflow }
    }
}

/// 页面表单字段
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub serper_api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub topic: String,
}

impl GenerateForm {
    pub fn to_request(&self) -> BlogRequest {
        let mut credentials = Credentials::new(self.api_key.clone());
        if !self.serper_api_key.trim().is_empty() {
            credentials = credentials.with_search_api_key(self.serper_api_key.clone());
        }
        if !self.model.trim().is_empty() {
            credentials = credentials.with_model(self.model.clone());
        }
        BlogRequest::new(credentials, self.topic.clone())
    }

    fn values(&self) -> FormValues {
        FormValues {
            api_key: self.api_key.clone(),
            serper_api_key: self.serper_api_key.clone(),
            model: self.model.clone(),
            topic: self.topic.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn index() -> Html<String> {
    Html(render_page(&FormValues::default(), &PageBody::Empty))
}

pub async fn health() -> &'static str {
    "ok"
}

/// 错误对应的HTTP状态码
pub fn error_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PipelineError::ModelSetup(_) | PipelineError::ExternalCall(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 处理一次生成请求，每次请求都是独立的运行
pub async fn generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> (StatusCode, Html<String>) {
    let values = form.values();
    let request = form.to_request();

    match state.workflow.execute(&request).await {
        Ok(report) => (
            StatusCode::OK,
            Html(render_page(
                &values.without_secrets(),
                &PageBody::Result(&report),
            )),
        ),
        // 仅在校验失败时回填API KEY
        Err(err) if err.is_validation() => (
            error_status(&err),
            Html(render_page(&values, &PageBody::Error(err.to_string()))),
        ),
        Err(err) => (
            error_status(&err),
            Html(render_page(
                &values.without_secrets(),
                &PageBody::Error(format!("Generation failed: {}", err)),
            )),
        ),
    }
}

/// 启动Web服务
pub async fn serve(config: Config) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::new(BlogWorkflow::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let addr = listener.local_addr()?;

    println!("🚀 blogwright running at http://{}", addr);
    tracing::info!(%addr, "web interface listening");

    axum::serve(listener, router(state))
        .await
        .context("Web server stopped unexpectedly")?;
    Ok(())
}
