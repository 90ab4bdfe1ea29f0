use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, Pool, Row, Sqlite};

use super::{open_pool, schema};
use crate::models::film::FilmRecord;
use crate::models::validation::NumberValidator;

/// 影片存储接口
///
/// 只在刷新管线里使用：服务路径读内存快照，不碰数据库。
#[async_trait]
pub trait FilmStore: Send + Sync {
    /// 整表替换，先清后插，单事务
    async fn replace_films(&self, films: &[FilmRecord]) -> Result<u64>;
    /// 按 id 升序读回全部影片，带库里分配的 id
    async fn load_films(&self) -> Result<Vec<FilmRecord>>;
    async fn count_films(&self) -> Result<i64>;
}

/// films 表行
///
/// 列都按可空读取：表也可能是老版抓取工具写的，那一版存的是
/// 字面 "Unknown" 和占位年份 0，转换时一并归一化。
#[derive(Debug, FromRow)]
struct FilmRow {
    id: i64,
    title: String,
    release_year: Option<i32>,
    director: Option<String>,
    box_office: Option<f64>,
    country: Option<String>,
}

impl From<FilmRow> for FilmRecord {
    fn from(row: FilmRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            release_year: row
                .release_year
                .filter(|y| NumberValidator::validate_year(*y).is_ok()),
            director: clean_name(row.director),
            box_office: row.box_office.unwrap_or(0.0).max(0.0),
            country: clean_name(row.country),
        }
    }
}

fn clean_name(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

/// SQLite 影片存储
#[derive(Clone)]
pub struct SqliteFilmStore {
    pool: Pool<Sqlite>,
}

impl SqliteFilmStore {
    /// 打开数据库并确保表结构就绪
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = open_pool(database_url).await?;
        schema::ensure_schema(&pool).await?;
        schema::verify_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl FilmStore for SqliteFilmStore {
    async fn replace_films(&self, films: &[FilmRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM films").execute(&mut *tx).await?;

        for film in films {
            sqlx::query(
                "INSERT INTO films (title, release_year, director, box_office, country)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&film.title)
            .bind(film.release_year)
            .bind(film.director.as_deref())
            .bind(film.box_office)
            .bind(film.country.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Replaced films table with {} records", films.len());
        Ok(films.len() as u64)
    }

    async fn load_films(&self) -> Result<Vec<FilmRecord>> {
        let rows: Vec<FilmRow> = sqlx::query_as(
            "SELECT id, title, release_year, director, box_office, country
             FROM films ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FilmRecord::from).collect())
    }

    async fn count_films(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM films")
            .fetch_one(&self.pool)
            .await?
            .get(0);

        Ok(count)
    }
}
