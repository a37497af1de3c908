//! # テスト用モック
//!
//! パイプラインと HTTP テストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! rivasdev-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rivasdev_domain::{
    clock::{Clock, SystemClock},
    notification::{EmailMessage, NotificationError},
    submission::{StoredSubmission, SubmissionId, SubmissionRecord},
};

use crate::{
    error::InfraError,
    health::HealthCheck,
    notification::NotificationSender,
    repository::SubmissionRepository,
};

// ===== InMemorySubmissionRepository =====

/// インメモリの送信レコードストア
///
/// `createdAt` は注入された [`Clock`] で採番する。
/// [`fail_with`](Self::fail_with) を呼ぶと以後の操作がすべて失敗する。
#[derive(Clone)]
pub struct InMemorySubmissionRepository<R> {
    records: Arc<Mutex<Vec<StoredSubmission<R>>>>,
    clock:   Arc<dyn Clock>,
    failure: Arc<Mutex<Option<String>>>,
}

impl<R: SubmissionRecord> InMemorySubmissionRepository<R> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            clock,
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// 以後の save / list_all を指定した理由で失敗させる
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(reason.into());
    }

    /// 保存済みレコード（挿入順）
    pub fn records(&self) -> Vec<StoredSubmission<R>> {
        self.records.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(reason) => Err(InfraError::unexpected(reason.clone())),
            None => Ok(()),
        }
    }
}

impl<R: SubmissionRecord> Default for InMemorySubmissionRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: SubmissionRecord> SubmissionRepository<R> for InMemorySubmissionRepository<R> {
    async fn save(&self, record: &R) -> Result<StoredSubmission<R>, InfraError> {
        self.check_failure()?;

        let stored = StoredSubmission {
            id:         SubmissionId::new(),
            record:     record.clone(),
            created_at: self.clock.now(),
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<StoredSubmission<R>>, InfraError> {
        self.check_failure()?;

        // 同時刻のレコードは後から挿入したものを先にする
        let mut records: Vec<_> = self.records.lock().unwrap().iter().rev().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

// ===== MockNotificationSender =====

/// 送信内容を記録するモック送信
///
/// [`failing_on_attempt`](Self::failing_on_attempt) で N 回目（1 始まり）の送信だけを失敗させられる。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:               Arc<Mutex<Vec<EmailMessage>>>,
    attempts:           Arc<AtomicUsize>,
    fail_on_attempt:    Option<usize>,
    connection_healthy: Arc<AtomicBool>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self {
            connection_healthy: Arc::new(AtomicBool::new(true)),
            ..Self::default()
        }
    }

    pub fn failing_on_attempt(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::new()
        }
    }

    /// verify_connection の結果を切り替える
    pub fn set_connection_healthy(&self, healthy: bool) {
        self.connection_healthy.store(healthy, Ordering::SeqCst);
    }

    /// 送信に成功したメール（送信順）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 失敗分を含む送信試行回数
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(NotificationError::SendFailed(
                "550 5.1.1 mailbox unavailable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    async fn verify_connection(&self) -> Result<(), NotificationError> {
        if self.connection_healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(NotificationError::ConnectionCheckFailed(
                "535 authentication failed".to_string(),
            ))
        }
    }
}

// ===== MockHealthCheck =====

/// 結果を固定できる疎通確認
#[derive(Debug, Clone)]
pub struct MockHealthCheck {
    name:    &'static str,
    healthy: Arc<AtomicBool>,
}

impl MockHealthCheck {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthCheck for MockHealthCheck {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> Result<(), InfraError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(InfraError::unexpected("connection refused"))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta};
    use rivasdev_domain::{clock::ManualClock, submission::ContactMessage};

    use super::*;

    fn contact(message: &str) -> ContactMessage {
        ContactMessage {
            name:    "Ana".to_string(),
            email:   "ana@example.com".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_allは作成日時の降順で返す() {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::starting_at(base);
        let repo =
            InMemorySubmissionRepository::<ContactMessage>::with_clock(Arc::new(clock.clone()));
        for (offset, message) in [(0, "primero"), (2, "tercero"), (1, "segundo")] {
            clock.set(base + TimeDelta::seconds(offset));
            repo.save(&contact(message)).await.unwrap();
        }

        let listed = repo.list_all().await.unwrap();

        let messages: Vec<_> = listed.iter().map(|s| s.record.message.as_str()).collect();
        assert_eq!(messages, vec!["tercero", "segundo", "primero"]);
    }

    #[tokio::test]
    async fn test_同時刻なら後から保存したものが先() {
        let clock = Arc::new(ManualClock::starting_at(DateTime::from_timestamp(0, 0).unwrap()));
        let repo = InMemorySubmissionRepository::<ContactMessage>::with_clock(clock);
        repo.save(&contact("a")).await.unwrap();
        repo.save(&contact("b")).await.unwrap();

        let listed = repo.list_all().await.unwrap();

        assert_eq!(listed[0].record.message, "b");
        assert_eq!(listed[1].record.message, "a");
    }

    #[tokio::test]
    async fn test_fail_with後は保存されない() {
        let repo = InMemorySubmissionRepository::<ContactMessage>::new();
        repo.fail_with("connection reset");

        let err = repo.save(&contact("x")).await.unwrap_err();

        assert_eq!(err.to_string(), "予期しないエラー: connection reset");
        assert!(repo.records().is_empty());
    }

    #[tokio::test]
    async fn test_指定した回の送信だけ失敗する() {
        let sender = MockNotificationSender::failing_on_attempt(2);
        let email = EmailMessage {
            sender_name: "RivasDev".to_string(),
            to:          "ana@example.com".to_string(),
            subject:     "s".to_string(),
            text_body:   "t".to_string(),
            html_body:   None,
        };

        assert!(sender.send_email(&email).await.is_ok());
        assert!(sender.send_email(&email).await.is_err());
        assert!(sender.send_email(&email).await.is_ok());
        assert_eq!(sender.attempt_count(), 3);
        assert_eq!(sender.sent_emails().len(), 2);
    }
}
