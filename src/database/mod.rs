use sqlx::{sqlite::{SqlitePoolOptions, SqliteConnectOptions}, Pool, Sqlite};
use anyhow::Result;
use std::str::FromStr;

pub mod films;
pub mod schema;

pub use films::{FilmStore, SqliteFilmStore};

/// 打开 SQLite 连接池
///
/// SQLite 单写入者，最大连接数限制为 1 避免锁冲突。URL 带 mode=rwc，
/// 数据库文件不存在时自动创建。
pub async fn open_pool(database_url: &str) -> Result<Pool<Sqlite>> {
    tracing::info!("Connecting to database: {}", database_url);

    // 配置 SQLite 连接选项
    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}
