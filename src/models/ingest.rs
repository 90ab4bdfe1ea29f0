use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// 刷新会话所处阶段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Pending,
    Fetching,
    Parsing,
    Enriching,
    Storing,
    Exporting,
    Completed,
    Failed,
}

/// 单次刷新会话的进度，前端通过 /api/ingest/status 轮询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestProgress {
    pub session_id: String,
    pub stage: IngestStage,
    pub message: String,
    pub films_parsed: usize,
    pub films_enriched: usize,
    pub enrich_total: usize,
    pub films_stored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl IngestProgress {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            stage: IngestStage::Pending,
            message: "Session created".to_string(),
            films_parsed: 0,
            films_enriched: 0,
            enrich_total: 0,
            films_stored: 0,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, IngestStage::Completed | IngestStage::Failed)
    }
}

/// 会话进度表，按 session_id 索引
pub type ProgressMap = Arc<RwLock<HashMap<String, IngestProgress>>>;

/// 触发刷新的响应
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRunResponse {
    pub session_id: String,
    pub message: String,
}
