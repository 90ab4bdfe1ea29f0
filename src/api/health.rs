use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::error::ApiResult;
use super::response::success;
use super::AppState;
use crate::engine::format_gross;

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let snapshot = state.dataset.snapshot().await;

    Ok(success(json!({
        "status": "healthy",
        "service": "film-explorer-backend",
        "version": "1.0.0",
        "films_loaded": snapshot.len(),
        "dataset_generation": snapshot.generation,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// 数据集统计信息
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let snapshot = state.dataset.snapshot().await;

    let top_film = snapshot
        .films
        .iter()
        .max_by(|a, b| a.box_office.total_cmp(&b.box_office))
        .map(|film| {
            json!({
                "title": film.title,
                "box_office": film.box_office,
                "box_office_label": format_gross(film.box_office),
            })
        });

    let years = snapshot.distinct_years();
    let total_box_office = snapshot.total_box_office();

    Ok(success(json!({
        "film_count": snapshot.len(),
        "total_box_office": total_box_office,
        "total_box_office_label": format_gross(total_box_office),
        "top_film": top_film,
        "newest_year": years.first(),
        "oldest_year": years.last(),
        "country_count": snapshot.distinct_countries().len(),
        "dataset_generation": snapshot.generation,
        "loaded_at": snapshot.loaded_at.to_rfc3339(),
        "source": snapshot.source,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
