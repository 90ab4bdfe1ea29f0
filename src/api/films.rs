use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::time::Instant;

use super::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::api::response::{paginated, success};
use crate::engine;
use crate::models::{FilmCardResponse, FilmQuery, FilterOptionsResponse, SortKey};

#[derive(Debug, Deserialize)]
pub struct FilmListParams {
    pub q: Option<String>,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// 影片列表：筛选、排序、分页都在当前快照上完成
pub async fn get_films(
    Query(params): Query<FilmListParams>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let start_time = Instant::now();

    let sort = SortKey::from_params(params.sort_by.as_deref(), params.sort_order.as_deref())
        .map_err(ApiError::BadRequest)?;
    let query = FilmQuery::new(params.q, params.year, params.country, sort);

    let snapshot = state.dataset.snapshot().await;
    let matches = engine::apply(&snapshot.films, &query);

    let page_size = params
        .limit
        .unwrap_or(state.config.page_size)
        .clamp(1, state.config.max_page_size);
    let slice = engine::paginate(&matches, page_size, params.page.unwrap_or(1));

    let items: Vec<FilmCardResponse> = slice
        .films
        .iter()
        .map(|film| FilmCardResponse::from(*film))
        .collect();

    tracing::debug!(
        "Film query matched {} of {} films in {}ms",
        slice.total,
        snapshot.len(),
        start_time.elapsed().as_millis()
    );

    Ok(paginated(
        items,
        slice.total,
        slice.page,
        slice.page_size,
        slice.total_pages,
    ))
}

/// 筛选下拉框的可选项，从当前快照推导
pub async fn get_filter_options(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let snapshot = state.dataset.snapshot().await;
    Ok(success(FilterOptionsResponse {
        years: snapshot.distinct_years(),
        countries: snapshot.distinct_countries(),
    }))
}
