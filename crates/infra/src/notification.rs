//! # メール送信
//!
//! 送信経路は起動時に `NOTIFICATION_BACKEND` で 1 つ選ぶ。
//! 失敗は再送せず、そのまま呼び出し元へ返す。

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
use rivasdev_domain::notification::{EmailMessage, NotificationError};
pub use smtp::{SmtpCredentials, SmtpNotificationSender, SmtpSecurity, SmtpSettings};

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    /// リレーへの接続と認証を確認する
    ///
    /// 起動時の診断用。接続を持たない実装は常に成功する。
    async fn verify_connection(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}
