use serde::{Deserialize, Serialize};

use super::validation::{NumberValidator, StringValidator, ValidationError, Validator};

/// 影片记录
///
/// 数据集中的一条影片。加载完成后不可变：查询引擎只做筛选和重排，
/// 从不修改记录本身。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmRecord {
    /// 入库后由 SQLite 自增主键分配，抓取阶段为 None
    pub id: Option<i64>,
    pub title: String,
    pub release_year: Option<i32>,
    pub director: Option<String>,
    /// 全球票房（美元），始终非负
    pub box_office: f64,
    /// 可能是空格分隔的多国列表
    pub country: Option<String>,
}

impl FilmRecord {
    /// 页面展示用的年份文本
    pub fn year_label(&self) -> String {
        match self.release_year {
            Some(year) => year.to_string(),
            None => "Unknown".to_string(),
        }
    }

    /// 导演展示文本，未知导演显示 "Unknown"
    ///
    /// 搜索匹配也使用这个值，所以搜 "unknown" 会命中导演缺失的影片，
    /// 和数据文件里存字面 "Unknown" 的行为一致。
    pub fn director_label(&self) -> &str {
        self.director.as_deref().unwrap_or("Unknown")
    }

    /// 国家展示文本，未知国家显示 "Unknown"
    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or("Unknown")
    }
}

impl Validator for FilmRecord {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), ValidationError> {
        StringValidator::validate_title(&self.title)?;

        if let Some(year) = self.release_year {
            NumberValidator::validate_year(year)?;
        }

        NumberValidator::validate_box_office(self.box_office)?;
        StringValidator::validate_optional_name(&self.director)?;
        StringValidator::validate_optional_name(&self.country)?;

        Ok(())
    }
}
