//! # 依存サービスの疎通確認
//!
//! Readiness Check（`/health/ready`）から呼ばれるプローブ。

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::InfraError;

/// 疎通確認トレイト
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// チェック結果のキー名（例: `"database"`）
    fn name(&self) -> &'static str;

    /// 疎通を確認する
    async fn check(&self) -> Result<(), InfraError>;
}

/// PostgreSQL の疎通確認（`SELECT 1`）
#[derive(Debug, Clone)]
pub struct PostgresHealthCheck {
    pool: PgPool,
}

impl PostgresHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PostgresHealthCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn check(&self) -> Result<(), InfraError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
