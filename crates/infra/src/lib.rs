//! # RivasDev インフラ層
//!
//! PostgreSQL と SMTP リレーへのアクセスを、domain の型だけを
//! 受け渡すトレイトの裏に閉じ込める（依存方向は `site-service → infra → domain`）。
//!
//! - [`db`] - 接続プールとマイグレーション
//! - [`repository`] - 送信レコードの保存・一覧（種別ごとに 1 つの JSONB テーブルを共有）
//! - [`notification`] - メール送信（SMTP / Noop）
//! - [`health`] - Readiness 用の疎通確認
//! - `mock` - インメモリ実装（`test-utils` feature）
//!
//! ```rust,ignore
//! use rivasdev_domain::submission::ContactMessage;
//! use rivasdev_infra::{db, repository::PostgresSubmissionRepository};
//!
//! let pool = db::create_pool(&database_url, db::PoolSettings::default()).await?;
//! db::run_migrations(&pool).await?;
//! let contacts = PostgresSubmissionRepository::<ContactMessage>::new(pool);
//! ```

pub mod db;
pub mod error;
pub mod health;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
