use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// 默认抓取的榜单页
pub const DEFAULT_WIKI_SOURCE_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_highest-grossing_films";

/// 应用配置，启动时从环境变量读取一次
///
/// 所有环境相关的值都集中在这里，随 AppState 传递，
/// 处理器不直接读环境变量。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// 启动时加载、刷新后导出的数据文件
    pub films_data_path: String,
    pub database_url: String,
    /// 列表接口的默认页大小
    pub page_size: usize,
    /// 列表接口允许的最大页大小
    pub max_page_size: usize,
    /// 图表默认条数
    pub chart_top_n: usize,
    /// 筛选结果不超过这个数量时图表跟随筛选
    pub chart_refine_threshold: usize,
    pub wiki_source_url: String,
    /// 刷新时最多抓取多少个条目页补充导演和国家
    pub ingest_enrich_limit: usize,
    /// 可选的前端静态文件目录
    pub static_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            films_data_path: "./data/films.json".to_string(),
            database_url: "sqlite:./data/films.db?mode=rwc".to_string(),
            page_size: 12,
            max_page_size: 100,
            chart_top_n: 10,
            chart_refine_threshold: 20,
            wiki_source_url: DEFAULT_WIKI_SOURCE_URL.to_string(),
            ingest_enrich_limit: 25,
            static_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: parse_var("PORT", defaults.port),
            films_data_path: env_or("FILMS_DATA_PATH", defaults.films_data_path),
            database_url: env_or("DATABASE_URL", defaults.database_url),
            page_size: parse_var("PAGE_SIZE", defaults.page_size).max(1),
            max_page_size: parse_var("MAX_PAGE_SIZE", defaults.max_page_size).max(1),
            chart_top_n: parse_var("CHART_TOP_N", defaults.chart_top_n).max(1),
            chart_refine_threshold: parse_var(
                "CHART_REFINE_THRESHOLD",
                defaults.chart_refine_threshold,
            ),
            wiki_source_url: env_or("WIKI_SOURCE_URL", defaults.wiki_source_url),
            ingest_enrich_limit: parse_var("INGEST_ENRICH_LIMIT", defaults.ingest_enrich_limit),
            static_dir: env::var("STATIC_DIR").ok().filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parse_var<T: FromStr + Copy + Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {} value '{}', using default {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
