//! # PostgreSQL 接続
//!
//! 起動時に 1 度だけプールを作り、全リポジトリで共有する。
//! スキーマは `migrations/` をバイナリに埋め込み、起動時に適用する。

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// 接続プールの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// 接続取得の待ち時間。超えると `PoolTimedOut`
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn create_pool(
    database_url: &str,
    settings: PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}

/// 未適用のマイグレーションを適用する
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
