use serde::{Deserialize, Serialize};

use crate::engine::chart::{format_gross, ChartBar, ChartScope};
use crate::models::film::FilmRecord;

/// 影片卡片响应DTO，带计算好的展示字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmCardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub release_year: Option<i32>,
    pub box_office: f64,

    // 计算字段：未知字段渲染为 "Unknown"，金额带单位后缀
    pub director: String,
    pub country: String,
    pub year_label: String,
    pub box_office_label: String,
}

impl From<&FilmRecord> for FilmCardResponse {
    fn from(film: &FilmRecord) -> Self {
        Self {
            id: film.id,
            title: film.title.clone(),
            release_year: film.release_year,
            box_office: film.box_office,
            director: film.director_label().to_string(),
            country: film.country_label().to_string(),
            year_label: film.year_label(),
            box_office_label: format_gross(film.box_office),
        }
    }
}

/// 图表数据来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    /// 筛选结果足够小，条形图直接画筛选结果
    Filtered,
    /// 回退到全量数据的票房前 N
    Overall,
    /// 数据集为空，没有可画的条形
    Empty,
}

impl From<ChartScope> for ChartSource {
    fn from(scope: ChartScope) -> Self {
        match scope {
            ChartScope::Filtered => ChartSource::Filtered,
            ChartScope::Overall => ChartSource::Overall,
        }
    }
}

/// 单根条形的响应DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBarResponse {
    pub title: String,
    pub release_year: Option<i32>,
    pub box_office: f64,
    /// 相对最宽条的宽度，(0, 1]，最宽条恰好为 1.0
    pub width_fraction: f64,
    /// 人类可读的金额文本，如 "$2.92 billion"
    pub display_value: String,
}

impl From<&ChartBar<'_>> for ChartBarResponse {
    fn from(bar: &ChartBar<'_>) -> Self {
        Self {
            title: bar.film.title.clone(),
            release_year: bar.film.release_year,
            box_office: bar.film.box_office,
            width_fraction: bar.width_fraction,
            display_value: bar.display_value.clone(),
        }
    }
}

/// 条形图响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub bars: Vec<ChartBarResponse>,
    pub source: ChartSource,
    pub top_n: usize,
    /// 当前筛选条件命中的记录数
    pub matching_total: usize,
}

/// 下拉框可选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    /// 年份降序
    pub years: Vec<i32>,
    /// 国家名升序
    pub countries: Vec<String>,
}
