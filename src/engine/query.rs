use crate::models::film::FilmRecord;
use crate::models::query::{FilmQuery, SortField, SortKey, SortOrder};

/// 查询管线：筛选 → 排序 → 分页
///
/// 全部是纯函数。输入数据集在请求期间不可变，这里只返回记录引用的
/// 重排序列，绝不复制或修改记录。

/// 按查询条件筛选并排序
///
/// 没有排序键时保持输入顺序；空结果是合法输出，不是错误。
pub fn apply<'a>(records: &'a [FilmRecord], query: &FilmQuery) -> Vec<&'a FilmRecord> {
    let mut films: Vec<&FilmRecord> = records.iter().filter(|f| matches(f, query)).collect();

    if let Some(key) = query.sort {
        sort_films(&mut films, key);
    }

    films
}

/// 筛选谓词：所有已激活的条件必须同时满足
fn matches(film: &FilmRecord, query: &FilmQuery) -> bool {
    if let Some(term) = &query.search {
        let term = term.to_lowercase();
        let in_title = film.title.to_lowercase().contains(&term);
        let in_director = film.director_label().to_lowercase().contains(&term);
        if !in_title && !in_director {
            return false;
        }
    }

    if let Some(year) = query.year {
        if film.release_year != Some(year) {
            return false;
        }
    }

    if let Some(country) = &query.country {
        if !film.country_label().contains(country.as_str()) {
            return false;
        }
    }

    true
}

/// 稳定排序。数值字段按数值比较，标题按不区分大小写的字符串顺序；
/// 未知年份当作最早处理。
fn sort_films(films: &mut [&FilmRecord], key: SortKey) {
    films.sort_by(|a, b| {
        let ordering = match key.field {
            SortField::BoxOffice => a.box_office.total_cmp(&b.box_office),
            SortField::Year => a.release_year.unwrap_or(0).cmp(&b.release_year.unwrap_or(0)),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match key.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// 单页切片及派生的分页信息
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub films: Vec<&'a FilmRecord>,
    /// 实际返回的页码（越界请求收敛后的值）
    pub page: usize,
    pub page_size: usize,
    /// 筛选后的记录总数
    pub total: usize,
    /// 至少为 1，空结果集也有第 1 页（空切片）
    pub total_pages: usize,
}

/// 对筛选结果分页
///
/// 页码从 1 开始。越界页码在这里收敛到 [1, total_pages]，调用方
/// 不需要预先检查；对空集请求第 1 页返回空切片，不是错误。
pub fn paginate<'a>(films: &[&'a FilmRecord], page_size: usize, page: usize) -> PageSlice<'a> {
    debug_assert!(page_size > 0, "page_size must be positive");
    let page_size = page_size.max(1);

    let total = films.len();
    let total_pages = (((total as f64) / (page_size as f64)).ceil() as usize).max(1);
    let page = page.clamp(1, total_pages);

    let slice: Vec<&FilmRecord> = films
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .copied()
        .collect();

    PageSlice {
        films: slice,
        page,
        page_size,
        total,
        total_pages,
    }
}
