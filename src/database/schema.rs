use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// 建表。列和导出的 JSON 字段一一对应，id 由自增主键分配。
pub async fn ensure_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS films (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            release_year INTEGER,
            director TEXT,
            box_office REAL,
            country TEXT
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// 验证数据库schema完整性
pub async fn verify_schema(pool: &Pool<Sqlite>) -> Result<()> {
    let exists = sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
        .bind("films")
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Err(anyhow::anyhow!("Required table 'films' does not exist"));
    }

    tracing::info!("Database schema verification completed successfully");
    Ok(())
}
