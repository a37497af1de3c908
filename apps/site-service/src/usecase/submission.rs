//! # 送信パイプライン
//!
//! フォーム送信 1 件に対して「検証 → 保存 → 通知」を順に実行する。
//!
//! ## 状態遷移
//!
//! ```text
//! 受信 → 検証中 ─┬→ 検証失敗（終端）
//!               └→ 保存中 ─┬→ 保存失敗（終端）
//!                         └→ 通知中 ─┬→ 通知失敗（終端、レコードは残る）
//!                                   └→ 成功（終端）
//! ```
//!
//! どの失敗状態からもリトライはしない。各ステップの完了を待って次に進む。
//!
//! ## 種別ごとの構成
//!
//! | 種別 | 通知 |
//! |------|------|
//! | お問い合わせ | [`with_notifier`](SubmissionPipeline::with_notifier) で設定 |
//! | 見積もり依頼 | [`with_notifier`](SubmissionPipeline::with_notifier) で設定 |
//! | レビュー | なし |

use std::sync::Arc;

use rivasdev_domain::{
    DomainError,
    notification::NotificationError,
    submission::{StoredSubmission, SubmissionForm, SubmissionRecord},
};
use rivasdev_infra::{InfraError, repository::SubmissionRepository};
use rivasdev_shared::{event_log::event, log_business_event};
use thiserror::Error;

use super::SubmissionNotifier;

/// 失敗したパイプラインのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStage {
    Validating,
    Persisting,
    Notifying,
}

/// 送信パイプラインのエラー
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// 必須項目の未入力など。保存も通知も行われていない
    #[error("入力検証に失敗: {0}")]
    Validation(#[from] DomainError),

    /// ストアへの保存に失敗。通知は行われていない
    #[error("保存に失敗: {0}")]
    Persistence(#[from] InfraError),

    /// 通知に失敗。レコードは保存済み
    #[error("通知に失敗: {0}")]
    Notification(#[from] NotificationError),
}

impl SubmissionError {
    pub fn stage(&self) -> SubmissionStage {
        match self {
            Self::Validation(_) => SubmissionStage::Validating,
            Self::Persistence(_) => SubmissionStage::Persisting,
            Self::Notification(_) => SubmissionStage::Notifying,
        }
    }
}

/// 送信パイプライン
///
/// レコード種別 `R` ごとに 1 インスタンスを構築する。
/// ストアと通知サービスは起動時に注入し、リクエスト間で共有する。
pub struct SubmissionPipeline<R: SubmissionRecord> {
    repository: Arc<dyn SubmissionRepository<R>>,
    notifier:   Option<Arc<SubmissionNotifier>>,
}

impl<R: SubmissionRecord> SubmissionPipeline<R> {
    /// 通知なしのパイプラインを作成する
    pub fn new(repository: Arc<dyn SubmissionRepository<R>>) -> Self {
        Self {
            repository,
            notifier: None,
        }
    }

    /// 保存後に通知を送るよう設定する
    pub fn with_notifier(mut self, notifier: Arc<SubmissionNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// フォームを検証・保存し、必要なら通知を送る
    ///
    /// 成功時は保存済みレコードを返す。
    #[tracing::instrument(skip_all, fields(kind = %R::KIND))]
    pub async fn submit<F>(&self, form: F) -> Result<StoredSubmission<R>, SubmissionError>
    where
        F: SubmissionForm<Record = R>,
    {
        let kind_str = R::KIND.as_str();

        let record = form.validate().inspect_err(|e| {
            log_business_event!(
                event.category = event::category::SUBMISSION,
                event.action = event::action::SUBMISSION_REJECTED,
                event.entity_type = kind_str,
                event.result = event::result::FAILURE,
                submission.field = e.field(),
                "送信を受け付けなかった"
            );
        })?;

        let stored = self.repository.save(&record).await?;
        log_business_event!(
            event.category = event::category::SUBMISSION,
            event.action = event::action::SUBMISSION_PERSISTED,
            event.entity_type = kind_str,
            event.entity_id = %stored.id,
            event.result = event::result::SUCCESS,
            "送信レコードを保存"
        );

        if let Some(notifier) = &self.notifier
            && let Some(notification) = stored.record.notification()
        {
            notifier.notify(&notification).await?;
        }

        log_business_event!(
            event.category = event::category::SUBMISSION,
            event.action = event::action::SUBMISSION_COMPLETED,
            event.entity_type = kind_str,
            event.entity_id = %stored.id,
            event.result = event::result::SUCCESS,
            "送信処理が完了"
        );

        Ok(stored)
    }

    /// 保存済みレコードを新しい順にすべて返す
    pub async fn list(&self) -> Result<Vec<StoredSubmission<R>>, InfraError> {
        self.repository.list_all().await
    }
}
