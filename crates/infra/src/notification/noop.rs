//! 送信しない実装。ローカル開発や `NOTIFICATION_BACKEND=noop` 用。

use async_trait::async_trait;
use rivasdev_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            from = %email.sender_name,
            to = %email.to,
            subject = %email.subject,
            html = email.html_body.is_some(),
            "送信をスキップ（noop）"
        );
        Ok(())
    }
}
