use anyhow::{Context, Result};
use serde::Deserialize;

use super::FilmDataset;
use crate::models::film::FilmRecord;
use crate::models::validation::NumberValidator;

/// 数据文件里的原始条目。任何字段都可能缺失或为 null，
/// 逐条降级处理，只有整个文件读不出来才算致命。
#[derive(Debug, Deserialize)]
pub struct RawFilmRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub box_office: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
}

/// 启动时一次性加载数据文件
///
/// 文件缺失或不是合法 JSON 数组是致命错误，由调用方终止进程；
/// 单条记录的问题按 normalize 的规则降级。
pub async fn load_from_path(path: &str) -> Result<FilmDataset> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read dataset file: {}", path))?;

    let films = parse_records(&bytes)?;
    tracing::info!("📚 Loaded {} films from {}", films.len(), path);

    Ok(FilmDataset::new(films, path))
}

/// 解析并归一化一份 JSON 数据
pub fn parse_records(bytes: &[u8]) -> Result<Vec<FilmRecord>> {
    let raw: Vec<RawFilmRecord> =
        serde_json::from_slice(bytes).context("dataset file is not a JSON array of film records")?;

    let mut films = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for entry in raw {
        match normalize(entry) {
            Some(film) => films.push(film),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} records without a usable title", skipped);
    }

    Ok(films)
}

/// 字段归一化
///
/// 缺标题的记录整条丢弃；年份超出合理范围（含原始数据用的占位 0）
/// 视为未知；空串和字面 "Unknown" 的导演、国家视为未知；
/// 非法票房钳为 0 并告警。
pub fn normalize(raw: RawFilmRecord) -> Option<FilmRecord> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())?;

    let release_year = raw
        .release_year
        .filter(|y| NumberValidator::validate_year(*y).is_ok());

    let box_office = match raw.box_office {
        Some(v) if NumberValidator::validate_box_office(v).is_ok() => v,
        Some(v) => {
            tracing::warn!("Clamping invalid box office {} for '{}'", v, title);
            0.0
        }
        None => 0.0,
    };

    Some(FilmRecord {
        id: raw.id,
        title,
        release_year,
        director: clean_unknown(raw.director),
        box_office,
        country: clean_unknown(raw.country),
    })
}

fn clean_unknown(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_records() {
        let json = br#"[
            {"id": 1, "title": "Avatar", "release_year": 2009,
             "director": "James Cameron", "box_office": 2923706026.0,
             "country": "United States"}
        ]"#;
        let films = parse_records(json).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Avatar");
        assert_eq!(films[0].release_year, Some(2009));
        assert_eq!(films[0].id, Some(1));
    }

    #[test]
    fn test_parse_degrades_per_record() {
        let json = br#"[
            {"title": "No Year", "release_year": 0, "box_office": 1000000.0},
            {"title": "Negative", "box_office": -5.0},
            {"release_year": 2000, "box_office": 1.0},
            {"title": "Literal Unknowns", "director": "Unknown", "country": ""}
        ]"#;
        let films = parse_records(json).unwrap();

        // 缺标题的那条被丢掉
        assert_eq!(films.len(), 3);
        assert_eq!(films[0].release_year, None);
        assert_eq!(films[1].box_office, 0.0);
        assert_eq!(films[2].director, None);
        assert_eq!(films[2].country, None);
    }

    #[test]
    fn test_parse_tolerates_null_fields() {
        let json = br#"[{"title": "Nulls", "release_year": null,
                         "director": null, "box_office": null, "country": null}]"#;
        let films = parse_records(json).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].box_office, 0.0);
        assert_eq!(films[0].director_label(), "Unknown");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_records(br#"{"title": "not an array"}"#).is_err());
        assert!(parse_records(b"not json at all").is_err());
    }
}
