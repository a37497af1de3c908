//! # 通知サービス
//!
//! テンプレートレンダリング → 管理者通知 → 受付確認の順で送信する。
//!
//! ## 設計方針
//!
//! - **同期・fail-fast**: 管理者通知が失敗したら受付確認は送らずにエラーを返す
//! - **先にすべてレンダリング**: テンプレートの失敗で 1 通だけ送られる状態を作らない
//! - **補償なし**: 受付確認だけが失敗しても管理者通知は取り消さない

use std::sync::Arc;

use rivasdev_domain::notification::{
    EmailMessage,
    NotificationAudience,
    NotificationError,
    SubmissionNotification,
};
use rivasdev_infra::notification::NotificationSender;
use rivasdev_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;

/// 送信通知サービス
pub struct SubmissionNotifier {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    admin_email:       String,
}

impl SubmissionNotifier {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            admin_email: admin_email.into(),
        }
    }

    /// 管理者通知と受付確認を順に送信する
    pub async fn notify(&self, notification: &SubmissionNotification) -> Result<(), NotificationError> {
        let admin = self
            .template_renderer
            .render_admin(notification, &self.admin_email)?;
        let submitter = self.template_renderer.render_submitter(notification)?;

        self.send(notification, NotificationAudience::Admin, &admin)
            .await?;
        self.send(notification, NotificationAudience::Submitter, &submitter)
            .await
    }

    async fn send(
        &self,
        notification: &SubmissionNotification,
        audience: NotificationAudience,
        email: &EmailMessage,
    ) -> Result<(), NotificationError> {
        let audience_str: &str = audience.into();
        let kind_str = notification.kind().as_str();

        match self.sender.send_email(email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = kind_str,
                    event.result = event::result::SUCCESS,
                    notification.audience = audience_str,
                    notification.recipient = %email.to,
                    "通知メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = kind_str,
                    event.result = event::result::FAILURE,
                    notification.audience = audience_str,
                    notification.recipient = %email.to,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }
}
