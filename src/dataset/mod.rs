use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::film::FilmRecord;

pub mod loader;

/// 不可变的数据集快照
///
/// 查询全部在某一代快照上进行。刷新成功后整代替换，绝不原地修改，
/// 所以拿到快照的请求计算期间数据是冻结的。
#[derive(Debug)]
pub struct FilmDataset {
    pub films: Vec<FilmRecord>,
    /// 从 1 开始，每次替换加 1
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    /// 数据来源（文件路径）
    pub source: String,
}

impl FilmDataset {
    pub fn new(films: Vec<FilmRecord>, source: impl Into<String>) -> Self {
        Self {
            films,
            generation: 1,
            loaded_at: Utc::now(),
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn total_box_office(&self) -> f64 {
        self.films.iter().map(|f| f.box_office).sum()
    }

    /// 年份下拉框选项，降序，未知年份不进下拉框
    pub fn distinct_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.films.iter().filter_map(|f| f.release_year).collect();
        years.into_iter().rev().collect()
    }

    /// 国家下拉框选项，升序。多国条目按整串展示，
    /// 筛选用的是子串匹配，整串选项一定能命中。
    pub fn distinct_countries(&self) -> Vec<String> {
        let countries: BTreeSet<String> = self
            .films
            .iter()
            .map(|f| f.country_label().to_string())
            .collect();
        countries.into_iter().collect()
    }
}

/// 可整代替换的共享快照句柄
///
/// 读锁只护着指针读取，拿到 Arc 后立刻释放；写锁只护着指针替换。
#[derive(Clone)]
pub struct DatasetHandle {
    inner: Arc<RwLock<Arc<FilmDataset>>>,
}

impl DatasetHandle {
    pub fn new(dataset: FilmDataset) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(dataset))),
        }
    }

    /// 当前快照。请求内全程使用同一个快照
    pub async fn snapshot(&self) -> Arc<FilmDataset> {
        self.inner.read().await.clone()
    }

    /// 用新记录替换快照，返回新的代数
    pub async fn replace(&self, films: Vec<FilmRecord>, source: &str) -> u64 {
        let mut current = self.inner.write().await;
        let generation = current.generation + 1;
        *current = Arc::new(FilmDataset {
            films,
            generation,
            loaded_at: Utc::now(),
            source: source.to_string(),
        });
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(title: &str, year: Option<i32>, country: Option<&str>) -> FilmRecord {
        FilmRecord {
            id: None,
            title: title.to_string(),
            release_year: year,
            director: None,
            box_office: 1e9,
            country: country.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_distinct_years_descending_without_unknown() {
        let dataset = FilmDataset::new(
            vec![
                film("A", Some(1997), None),
                film("B", Some(2019), None),
                film("C", Some(1997), None),
                film("D", None, None),
            ],
            "test",
        );
        assert_eq!(dataset.distinct_years(), vec![2019, 1997]);
    }

    #[test]
    fn test_distinct_countries_sorted_with_unknown() {
        let dataset = FilmDataset::new(
            vec![
                film("A", None, Some("United States")),
                film("B", None, Some("Japan")),
                film("C", None, None),
                film("D", None, Some("Japan")),
            ],
            "test",
        );
        assert_eq!(
            dataset.distinct_countries(),
            vec!["Japan", "United States", "Unknown"]
        );
    }

    #[tokio::test]
    async fn test_replace_bumps_generation() {
        let handle = DatasetHandle::new(FilmDataset::new(vec![film("A", None, None)], "first"));
        let before = handle.snapshot().await;
        assert_eq!(before.generation, 1);

        let generation = handle.replace(vec![], "second").await;
        assert_eq!(generation, 2);

        let after = handle.snapshot().await;
        assert_eq!(after.generation, 2);
        assert!(after.is_empty());
        // 老快照在持有者手里保持不变
        assert_eq!(before.len(), 1);
    }
}
