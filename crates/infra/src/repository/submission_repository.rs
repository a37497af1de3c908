//! # SubmissionRepository
//!
//! フォーム送信レコードの保存と一覧取得を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **単一ドキュメントテーブル**: 3 種類のレコードを `submissions` テーブルに
//!   `kind` + JSONB `payload` として格納する
//! - **作成日時はストアが採番**: `created_at` は `clock_timestamp()` で決まり、
//!   `RETURNING` で呼び出し元に返す
//! - **二重の防御**: 必須フィールドはドメイン層で検証済みだが、
//!   テーブルの CHECK 制約でも再検証する
//! - **追記のみ**: UPDATE / DELETE は提供しない

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rivasdev_domain::submission::{StoredSubmission, SubmissionId, SubmissionRecord};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::error::InfraError;

/// 送信レコードリポジトリトレイト
///
/// レコード種別ごとに 1 インスタンスを持つ（`R::KIND` で対象を決める）。
#[async_trait]
pub trait SubmissionRepository<R: SubmissionRecord>: Send + Sync {
    /// レコードを保存し、採番された ID と作成日時を付けて返す
    async fn save(&self, record: &R) -> Result<StoredSubmission<R>, InfraError>;

    /// 保存済みレコードをすべて取得する（作成日時の降順）
    async fn list_all(&self) -> Result<Vec<StoredSubmission<R>>, InfraError>;
}

/// `submissions` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id:         Uuid,
    payload:    serde_json::Value,
    created_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_stored<R: SubmissionRecord>(self) -> Result<StoredSubmission<R>, InfraError> {
        Ok(StoredSubmission {
            id:         SubmissionId::from_uuid(self.id),
            record:     serde_json::from_value(self.payload)?,
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL 実装の SubmissionRepository
#[derive(Debug)]
pub struct PostgresSubmissionRepository<R> {
    pool:    PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> PostgresSubmissionRepository<R> {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<R> Clone for PostgresSubmissionRepository<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[async_trait]
impl<R: SubmissionRecord> SubmissionRepository<R> for PostgresSubmissionRepository<R> {
    #[tracing::instrument(skip_all, level = "debug", fields(kind = %R::KIND))]
    async fn save(&self, record: &R) -> Result<StoredSubmission<R>, InfraError> {
        let id = SubmissionId::new();

        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO submissions (id, kind, payload)
            VALUES ($1, $2, $3)
            RETURNING created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(R::KIND.as_str())
        .bind(Json(record))
        .fetch_one(&self.pool)
        .await?;

        Ok(StoredSubmission {
            id,
            record: record.clone(),
            created_at,
        })
    }

    #[tracing::instrument(skip_all, level = "debug", fields(kind = %R::KIND))]
    async fn list_all(&self) -> Result<Vec<StoredSubmission<R>>, InfraError> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, payload, created_at
            FROM submissions
            WHERE kind = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(R::KIND.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SubmissionRow::into_stored::<R>).collect()
    }
}

#[cfg(test)]
mod tests {
    use rivasdev_domain::submission::{ContactMessage, Review};

    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresSubmissionRepository<ContactMessage>>();
        assert_send_sync::<Box<dyn SubmissionRepository<Review>>>();
    }

    #[test]
    fn test_payloadからレコードを復元できる() {
        let row = SubmissionRow {
            id:         Uuid::now_v7(),
            payload:    serde_json::json!({
                "name": "Ana",
                "email": "ana@example.com",
                "message": "Hola",
            }),
            created_at: Utc::now(),
        };
        let id = row.id;

        let stored: StoredSubmission<ContactMessage> = row.into_stored().unwrap();

        assert_eq!(stored.id.as_uuid(), &id);
        assert_eq!(stored.record.message, "Hola");
    }

    #[test]
    fn test_payloadの形が合わなければserializationエラー() {
        let row = SubmissionRow {
            id:         Uuid::now_v7(),
            payload:    serde_json::json!({ "name": "Ana" }),
            created_at: Utc::now(),
        };

        let err = row.into_stored::<ContactMessage>().unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::error::InfraErrorKind::Serialization(_)
        ));
    }
}
