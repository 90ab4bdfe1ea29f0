use crate::models::film::FilmRecord;

/// 图表缩放：从记录集中选出票房前 N，算出最大值归一化的条宽
/// 和展示文本。和查询管线一样是纯函数，每次交互重新计算。

/// 单根条形的视图模型
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar<'a> {
    pub film: &'a FilmRecord,
    /// box_office / max(box_office)，选集中最宽的条恰好为 1.0
    pub width_fraction: f64,
    pub display_value: String,
}

/// 图表取数范围：筛选结果够小就画筛选结果，否则回到全量榜单
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope {
    Filtered,
    Overall,
}

/// 决定图表画哪份数据。空的筛选结果画不出有意义的图，回退全量。
pub fn choose_scope(filtered_count: usize, refine_threshold: usize) -> ChartScope {
    if filtered_count > 0 && filtered_count <= refine_threshold {
        ChartScope::Filtered
    } else {
        ChartScope::Overall
    }
}

/// 选出票房前 N，降序，并列保持原始顺序
pub fn top_by_box_office<'a>(records: &[&'a FilmRecord], n: usize) -> Vec<&'a FilmRecord> {
    let mut selected = records.to_vec();
    selected.sort_by(|a, b| b.box_office.total_cmp(&a.box_office));
    selected.truncate(n);
    selected
}

/// 计算条形图视图模型
///
/// 前置条件：records 非空且 top_n ≥ 1。空选集是调用方的编程错误，
/// 不是运行时错误路径，调用前先检查记录数。
pub fn scale<'a>(records: &[&'a FilmRecord], top_n: usize) -> Vec<ChartBar<'a>> {
    let selected = top_by_box_office(records, top_n);
    assert!(
        !selected.is_empty(),
        "scale requires a non-empty selection; callers must guard"
    );

    let max = selected[0].box_office;
    selected
        .into_iter()
        .map(|film| ChartBar {
            film,
            // 全零票房的退化数据集条宽为 0
            width_fraction: if max > 0.0 { film.box_office / max } else { 0.0 },
            display_value: format_gross(film.box_office),
        })
        .collect()
}

/// 人类可读的金额文本：十亿以上用 billion，百万以上用 million，
/// 其余显示千位分组的整数。
pub fn format_gross(amount: f64) -> String {
    if amount >= 1e9 {
        format!("${:.2} billion", amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.2} million", amount / 1e6)
    } else {
        format!("${}", group_thousands(amount.round() as i64))
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
