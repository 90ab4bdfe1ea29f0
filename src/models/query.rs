use serde::{Deserialize, Serialize};

/// 排序字段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortField {
    BoxOffice,
    Year,
    Title,
}

impl SortField {
    /// 字段的自然方向：票房和年份默认从大到小，标题默认 A-Z
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortField::BoxOffice | SortField::Year => SortOrder::Descending,
            SortField::Title => SortOrder::Ascending,
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::BoxOffice => write!(f, "box_office"),
            SortField::Year => write!(f, "year"),
            SortField::Title => write!(f, "title"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box_office" => Ok(SortField::BoxOffice),
            "year" => Ok(SortField::Year),
            "title" => Ok(SortField::Title),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// 排序键：字段加方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// 从查询参数解析。sort_by 缺失表示保持输入顺序；
    /// sort_order 缺失时用字段的自然方向；非法取值返回错误给 400。
    pub fn from_params(
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Option<SortKey>, String> {
        let Some(field_raw) = sort_by else {
            return Ok(None);
        };

        let field: SortField = field_raw.parse()?;
        let order = match sort_order {
            Some(raw) => raw.parse()?,
            None => field.default_order(),
        };

        Ok(Some(SortKey::new(field, order)))
    }
}

/// 查询条件
///
/// 每次请求由查询参数重建，瞬态。空白字符串在构建时归一化为未设置。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmQuery {
    /// 大小写不敏感的子串，匹配标题或导演
    pub search: Option<String>,
    /// 精确匹配上映年份
    pub year: Option<i32>,
    /// 国家字段的子串匹配
    pub country: Option<String>,
    /// None 表示保持筛选后的输入顺序
    pub sort: Option<SortKey>,
}

impl FilmQuery {
    pub fn new(
        search: Option<String>,
        year: Option<i32>,
        country: Option<String>,
        sort: Option<SortKey>,
    ) -> Self {
        Self {
            search: normalize_term(search),
            year,
            country: normalize_term(country),
            sort,
        }
    }
}

fn normalize_term(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
