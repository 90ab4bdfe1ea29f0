use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppConfig;
use crate::database::{FilmStore, SqliteFilmStore};
use crate::dataset::DatasetHandle;
use crate::external::WikipediaClient;
use crate::models::validation::NumberValidator;
use crate::models::{FilmRecord, IngestProgress, IngestStage, ProgressMap, Validator};
use crate::services::wiki_parser::{FilmDetails, WikiFilmParser};

/// 相邻两次条目页请求之间的基础间隔（秒）
const BASE_ENRICH_DELAY_SECS: f64 = 1.0;
/// 连续失败退避的间隔上限（秒）
const MAX_ENRICH_DELAY_SECS: f64 = 10.0;

/// 数据刷新管线
///
/// 抓列表页、解析榜单、逐条补充条目页信息、落库、导出 JSON，
/// 最后整代替换内存快照。任何一步失败都只标记会话失败，
/// 当前快照原样保留，查询接口不受影响。
pub struct IngestService {
    client: WikipediaClient,
    parser: WikiFilmParser,
    config: Arc<AppConfig>,
    dataset: DatasetHandle,
    run_guard: Arc<Mutex<()>>,
}

impl IngestService {
    pub fn new(config: Arc<AppConfig>, dataset: DatasetHandle) -> Result<Self> {
        Ok(Self {
            client: WikipediaClient::new(&config.wiki_source_url)?,
            parser: WikiFilmParser::new(),
            config,
            dataset,
            run_guard: Arc::new(Mutex::new(())),
        })
    }

    /// 申请运行权。同一时刻只允许一个刷新会话，
    /// 拿不到锁说明已有会话在跑，调用方应返回冲突。
    pub fn try_begin(&self) -> Option<OwnedMutexGuard<()>> {
        self.run_guard.clone().try_lock_owned().ok()
    }

    /// 跑完整个管线，结果写进会话进度表
    pub async fn run(&self, session_id: String, progress: ProgressMap) {
        tracing::info!("🔄 Ingest session {} started", session_id);
        match self.run_inner(&session_id, &progress).await {
            Ok(stored) => {
                tracing::info!("✅ Ingest session {} completed with {} films", session_id, stored);
            }
            Err(err) => {
                tracing::error!("Ingest session {} failed: {:#}", session_id, err);
                update_progress(&progress, session_id.as_str(), |p| {
                    p.stage = IngestStage::Failed;
                    p.message = "Ingest failed".to_string();
                    p.error = Some(format!("{:#}", err));
                    p.finished_at = Some(Utc::now());
                })
                .await;
            }
        }
    }

    async fn run_inner(&self, session_id: &str, progress: &ProgressMap) -> Result<usize> {
        set_stage(
            progress,
            session_id,
            IngestStage::Fetching,
            format!("Fetching film list from {}", self.client.source_url()),
        )
        .await;
        let list_page = self
            .client
            .fetch_list_page()
            .await
            .context("failed to fetch the film list page")?;

        set_stage(
            progress,
            session_id,
            IngestStage::Parsing,
            "Parsing the box office table",
        )
        .await;
        let parsed = self
            .parser
            .extract_films(&list_page)
            .context("failed to parse films from the list page")?;
        tracing::info!("🎬 Parsed {} films from the list page", parsed.len());

        let enrich_limit = self.config.ingest_enrich_limit;
        let enrich_total = parsed
            .iter()
            .take(enrich_limit)
            .filter(|f| f.article_href.is_some())
            .count();
        update_progress(progress, session_id, |p| {
            p.stage = IngestStage::Enriching;
            p.message = format!("Enriching films from {} article pages", enrich_total);
            p.films_parsed = parsed.len();
            p.enrich_total = enrich_total;
        })
        .await;

        let mut records: Vec<FilmRecord> = Vec::with_capacity(parsed.len());
        let mut consecutive_failures: u32 = 0;
        for (index, film) in parsed.into_iter().enumerate() {
            let mut details = FilmDetails::default();
            if index < enrich_limit {
                if let Some(href) = film.article_href.as_deref() {
                    // 礼貌间隔，连续失败时指数退避
                    let delay = (BASE_ENRICH_DELAY_SECS * 2f64.powi(consecutive_failures as i32))
                        .min(MAX_ENRICH_DELAY_SECS);
                    tokio::time::sleep(Duration::from_secs_f64(delay)).await;

                    match self.client.fetch_article(href).await {
                        Ok(article) => {
                            details = self.parser.extract_details(&article);
                            if details.director.is_none() && details.country.is_none() {
                                consecutive_failures += 1;
                            } else {
                                consecutive_failures = consecutive_failures.saturating_sub(1);
                            }
                        }
                        Err(err) => {
                            consecutive_failures += 1;
                            tracing::warn!(
                                "Failed to fetch article for '{}': {:#}",
                                film.title,
                                err
                            );
                        }
                    }
                    update_progress(progress, session_id, |p| p.films_enriched += 1).await;
                }
            }

            let record = FilmRecord {
                id: None,
                title: film.title,
                release_year: film
                    .release_year
                    .filter(|year| NumberValidator::validate_year(*year).is_ok()),
                director: details.director,
                box_office: film.box_office,
                country: details.country,
            };
            match record.validate() {
                Ok(()) => records.push(record),
                Err(err) => tracing::warn!("Skipping invalid film '{}': {}", record.title, err),
            }
        }

        set_stage(
            progress,
            session_id,
            IngestStage::Storing,
            "Writing films to the database",
        )
        .await;
        let store = SqliteFilmStore::connect(&self.config.database_url)
            .await
            .context("failed to open the film database")?;
        let stored = store
            .replace_films(&records)
            .await
            .context("failed to store films in the database")?;
        update_progress(progress, session_id, |p| p.films_stored = stored as usize).await;
        tracing::info!("💾 Stored {} films in the database", stored);

        set_stage(
            progress,
            session_id,
            IngestStage::Exporting,
            format!("Exporting films to {}", self.config.films_data_path),
        )
        .await;
        // 回读拿到数据库分配的 id，导出文件和快照都用这一份
        let stored_films = store
            .load_films()
            .await
            .context("failed to read films back from the database")?;
        let json = serde_json::to_vec_pretty(&stored_films)
            .context("failed to serialize films to JSON")?;
        let export_path = Path::new(&self.config.films_data_path);
        if let Some(parent) = export_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        tokio::fs::write(export_path, &json)
            .await
            .with_context(|| format!("failed to write {}", export_path.display()))?;
        tracing::info!(
            "📦 Exported {} films to {}",
            stored_films.len(),
            self.config.films_data_path
        );

        let count = stored_films.len();
        let generation = self
            .dataset
            .replace(stored_films, &self.config.wiki_source_url)
            .await;
        tracing::info!("🔄 Dataset snapshot replaced, generation {}", generation);

        update_progress(progress, session_id, |p| {
            p.stage = IngestStage::Completed;
            p.message = format!("Ingested {} films", count);
            p.finished_at = Some(Utc::now());
        })
        .await;

        Ok(count)
    }
}

async fn set_stage(
    progress: &ProgressMap,
    session_id: &str,
    stage: IngestStage,
    message: impl Into<String>,
) {
    let message = message.into();
    tracing::debug!("Ingest session {} -> {:?}: {}", session_id, stage, message);
    update_progress(progress, session_id, |p| {
        p.stage = stage;
        p.message = message;
    })
    .await;
}

async fn update_progress(
    progress: &ProgressMap,
    session_id: &str,
    apply: impl FnOnce(&mut IngestProgress),
) {
    let mut sessions = progress.write().await;
    if let Some(entry) = sessions.get_mut(session_id) {
        apply(entry);
    }
}
