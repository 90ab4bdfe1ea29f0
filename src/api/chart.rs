use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::response::success;
use crate::engine::{self, ChartScope};
use crate::models::{ChartBarResponse, ChartResponse, ChartSource, FilmQuery};

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub q: Option<String>,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub top: Option<usize>,
}

/// 票房条形图数据
///
/// 筛选命中数不超过阈值时图表画筛选结果本身，否则退回
/// 全量数据的票房前 N。数据集为空时返回空图，不是错误。
pub async fn get_chart(
    Query(params): Query<ChartParams>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let top_n = params.top.unwrap_or(state.config.chart_top_n).max(1);
    let snapshot = state.dataset.snapshot().await;

    if snapshot.is_empty() {
        return Ok(success(ChartResponse {
            bars: Vec::new(),
            source: ChartSource::Empty,
            top_n,
            matching_total: 0,
        }));
    }

    let query = FilmQuery::new(params.q, params.year, params.country, None);
    let matches = engine::apply(&snapshot.films, &query);

    let scope = engine::chart::choose_scope(matches.len(), state.config.chart_refine_threshold);
    let selection = match scope {
        ChartScope::Filtered => matches.clone(),
        ChartScope::Overall => snapshot.films.iter().collect(),
    };

    let bars: Vec<ChartBarResponse> = engine::scale(&selection, top_n)
        .iter()
        .map(ChartBarResponse::from)
        .collect();

    Ok(success(ChartResponse {
        bars,
        source: scope.into(),
        top_n,
        matching_total: matches.len(),
    }))
}
