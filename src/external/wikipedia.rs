use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use moka::future::Cache;
use url::Url;

/// Wikipedia 不欢迎默认的程序 UA，用浏览器 UA 抓取
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_ATTEMPTS: u32 = 3;
const BASE_TIMEOUT_SECS: u64 = 10;
const PAGE_CACHE_CAPACITY: u64 = 64;
const PAGE_CACHE_TTL_SECS: u64 = 15 * 60;

/// Wikipedia 页面客户端
///
/// 带重试和页面缓存：榜单页加条目页一次刷新要抓几十个页面，
/// 失败的请求按指数退避重试，单次超时逐次翻倍。
#[derive(Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    source_url: Url,
    page_cache: Cache<String, String>,
}

impl WikipediaClient {
    pub fn new(source_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        let source_url = Url::parse(source_url)
            .with_context(|| format!("invalid source URL: {}", source_url))?;

        let page_cache = Cache::builder()
            .max_capacity(PAGE_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(PAGE_CACHE_TTL_SECS))
            .build();

        Ok(Self {
            client,
            source_url,
            page_cache,
        })
    }

    pub fn source_url(&self) -> &str {
        self.source_url.as_str()
    }

    /// 抓取榜单页 HTML
    pub async fn fetch_list_page(&self) -> Result<String> {
        self.fetch_page(self.source_url.clone()).await
    }

    /// 按条目链接抓取影片页，相对链接（/wiki/...）基于榜单页解析
    pub async fn fetch_article(&self, href: &str) -> Result<String> {
        let url = self
            .source_url
            .join(href)
            .with_context(|| format!("invalid article link: {}", href))?;
        self.fetch_page(url).await
    }

    async fn fetch_page(&self, url: Url) -> Result<String> {
        let key = url.to_string();
        if let Some(html) = self.page_cache.get(&key).await {
            tracing::debug!("Page cache hit: {}", key);
            return Ok(html);
        }

        let mut last_error = None;
        for attempt in 0..FETCH_ATTEMPTS {
            if attempt > 0 {
                let wait = Duration::from_secs(2u64.pow(attempt - 1));
                tracing::warn!("Retrying {} in {:?} (attempt {}/{})", url, wait, attempt + 1, FETCH_ATTEMPTS);
                tokio::time::sleep(wait).await;
            }

            let timeout = Duration::from_secs(BASE_TIMEOUT_SECS * 2u64.pow(attempt));
            match self.try_fetch(&url, timeout).await {
                Ok(html) => {
                    self.page_cache.insert(key, html.clone()).await;
                    return Ok(html);
                }
                Err(err) => {
                    tracing::warn!("Fetch failed for {}: {:#}", url, err);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("fetch failed: {}", url)))
    }

    async fn try_fetch(&self, url: &Url, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Wikipedia returned status {} for {}", response.status(), url));
        }

        Ok(response.text().await?)
    }
}
