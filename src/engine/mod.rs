// 查询引擎：无状态纯函数，每次请求在不可变快照上重新计算

pub mod chart;
pub mod query;

pub use chart::{format_gross, scale, top_by_box_office, ChartBar, ChartScope};
pub use query::{apply, paginate, PageSlice};
