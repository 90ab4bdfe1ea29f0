use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tokio::sync::RwLock;

use super::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::api::response::success;
use crate::models::{IngestProgress, IngestRunResponse, ProgressMap};

lazy_static::lazy_static! {
    static ref INGEST_SESSIONS: ProgressMap = Arc::new(RwLock::new(HashMap::new()));
}

/// POST /api/ingest/run
///
/// 触发一次数据刷新，立即返回 session_id 供前端轮询。
/// 已有会话在跑时返回 409，不排队。
pub async fn run_ingest(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let guard = state.ingest.try_begin().ok_or_else(|| {
        ApiError::Conflict("An ingest session is already running".to_string())
    })?;

    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Starting ingest session {}", session_id);

    {
        let mut sessions = INGEST_SESSIONS.write().await;
        sessions.insert(session_id.clone(), IngestProgress::new(session_id.as_str()));
    }

    let service = state.ingest.clone();
    let progress = INGEST_SESSIONS.clone();
    let session_id_clone = session_id.clone();
    tokio::spawn(async move {
        // 运行权跟着任务走，结束时自动释放
        let _guard = guard;
        service.run(session_id_clone, progress).await;
    });

    // 立即返回session_id，让前端开始轮询
    Ok(success(IngestRunResponse {
        session_id,
        message: "Ingest started".to_string(),
    }))
}

/// GET /api/ingest/status/:session_id
pub async fn get_ingest_status(
    Path(session_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let sessions = INGEST_SESSIONS.read().await;
    let progress = sessions
        .get(&session_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", session_id)))?;

    Ok(success(progress))
}
