//! HTTP边界层：把两个请求入口映射到调研核心

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generator::agents::generate_clarifying_questions;
use crate::generator::context::ResearchContext;
use crate::generator::types::{ClarifyingQuestions, ReportQuery};
use crate::generator::workflow::generate_report;
use crate::llm::LanguageModel;
use crate::search::SearchProvider;

/// axum处理函数共享的调研上下文
pub type SharedContext<M, S> = Arc<ResearchContext<M, S>>;

const REPORT_FAILURE_PREFIX: &str = "An error occurred while generating the report";

/// 澄清问题请求体
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_query: String,
}

/// 边界层错误，序列化为 `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// 构建路由：`/api/ai/*` 两个入口 + `/health`
pub fn router<M, S>(context: SharedContext<M, S>) -> Router
where
    M: LanguageModel + 'static,
    S: SearchProvider + 'static,
{
    let cors = cors_layer(&context.config.server.allowed_origins);

    let api = Router::new()
        .route(
            "/get_carifying_questions",
            post(clarifying_questions_handler::<M, S>),
        )
        .route(
            "/get_clarifying_questions",
            post(clarifying_questions_handler::<M, S>),
        )
        .route("/get_report", post(report_handler::<M, S>));

    Router::new()
        .nest("/api/ai", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "忽略无效的跨域来源");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn clarifying_questions_handler<M, S>(
    State(context): State<SharedContext<M, S>>,
    Json(query): Json<UserQuery>,
) -> Response
where
    M: LanguageModel + 'static,
    S: SearchProvider + 'static,
{
    tracing::info!(user_query = %query.user_query, "收到澄清问题请求");

    match generate_clarifying_questions(&context.llm_client, &query.user_query).await {
        questions @ ClarifyingQuestions::Questions(_) => Json(questions).into_response(),
        sentinel @ ClarifyingQuestions::Failed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(sentinel)).into_response()
        }
    }
}

async fn report_handler<M, S>(
    State(context): State<SharedContext<M, S>>,
    Json(query): Json<ReportQuery>,
) -> Result<Json<String>, ApiError>
where
    M: LanguageModel + 'static,
    S: SearchProvider + 'static,
{
    tracing::info!(
        user_query = %query.user_query,
        qa_pairs = query.qa_list.len(),
        "收到报告生成请求"
    );

    generate_report(&context, &query.user_query, &query.qa_list)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "报告生成失败");
            ApiError::internal(format!("{}: {}", REPORT_FAILURE_PREFIX, e))
        })
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 启动HTTP服务，直到收到Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let context = Arc::new(ResearchContext::new(config.clone())?);
    let app = router(context);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "HTTP服务已启动");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "无法监听Ctrl-C信号");
    }
}
