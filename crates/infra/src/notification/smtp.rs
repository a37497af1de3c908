//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用して SMTP リレー（Gmail 等）経由でメールを送信する。

use std::str::FromStr;

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use rivasdev_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// トランスポートのセキュリティモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SmtpSecurity {
    /// 平文で接続し STARTTLS で昇格する（通常 587 番）
    #[default]
    StartTls,
    /// 接続時から TLS（通常 465 番）
    Tls,
    /// TLS なし（Mailpit 等のローカル SMTP 向け）
    None,
}

/// SMTP 認証情報
#[derive(Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// SMTP 接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host:         String,
    pub port:         u16,
    pub security:     SmtpSecurity,
    pub credentials:  Option<SmtpCredentials>,
    /// 送信元メールアドレス（表示名は [`EmailMessage::sender_name`] で指定）
    pub from_address: String,
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport:    AsyncSmtpTransport<Tokio1Executor>,
    from_address: Address,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// 接続は送信時に確立される。ここでは設定値の検証のみ行う。
    pub fn new(settings: SmtpSettings) -> Result<Self, NotificationError> {
        let from_address = Address::from_str(&settings.from_address).map_err(|e| {
            NotificationError::InvalidAddress(format!("送信元アドレス不正: {e}"))
        })?;

        let builder = match settings.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| NotificationError::SendFailed(format!("TLS 設定失敗: {e}")))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| NotificationError::SendFailed(format!("TLS 設定失敗: {e}")))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let builder = builder.port(settings.port);
        let transport = match settings.credentials {
            Some(credentials) => builder
                .credentials(Credentials::new(credentials.username, credentials.password))
                .build(),
            None => builder.build(),
        };

        Ok(Self {
            transport,
            from_address,
        })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let from = Mailbox::new(Some(email.sender_name.clone()), self.from_address.clone());
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("宛先アドレス不正: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(&email.subject);

        let message = match &email.html_body {
            Some(html_body) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.clone()),
                    ),
            ),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.text_body.clone()),
        };

        message.map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        Ok(())
    }

    async fn verify_connection(&self) -> Result<(), NotificationError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotificationError::ConnectionCheckFailed(
                "SMTP サーバーが NOOP に応答しない".to_string(),
            )),
            Err(e) => Err(NotificationError::ConnectionCheckFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host:         "localhost".to_string(),
            port:         1025,
            security:     SmtpSecurity::None,
            credentials:  None,
            from_address: "no-reply@rivasdev.com".to_string(),
        }
    }

    fn email(html_body: Option<&str>) -> EmailMessage {
        EmailMessage {
            sender_name: "RivasDev".to_string(),
            to:          "ana@example.com".to_string(),
            subject:     "Gracias por contactarnos".to_string(),
            text_body:   "Hola Ana".to_string(),
            html_body:   html_body.map(str::to_string),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[rstest]
    #[case("starttls", SmtpSecurity::StartTls)]
    #[case("TLS", SmtpSecurity::Tls)]
    #[case("none", SmtpSecurity::None)]
    fn test_セキュリティモードを文字列から解釈できる(
        #[case] input: &str,
        #[case] expected: SmtpSecurity,
    ) {
        assert_eq!(input.parse::<SmtpSecurity>().unwrap(), expected);
    }

    #[test]
    fn test_不正な送信元アドレスはinvalid_address() {
        let result = SmtpNotificationSender::new(SmtpSettings {
            from_address: "not-an-address".to_string(),
            ..settings()
        });

        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }

    #[test]
    fn test_送信元は表示名付きで出力される() {
        let sender = SmtpNotificationSender::new(settings()).unwrap();

        let message = sender.build_message(&email(None)).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        let from_line = raw.lines().find(|line| line.starts_with("From: ")).unwrap();
        assert!(from_line.contains("RivasDev"), "{from_line}");
        assert!(from_line.contains("<no-reply@rivasdev.com>"), "{from_line}");
        assert!(raw.contains("ana@example.com"), "{raw}");
        assert!(!raw.contains("multipart/alternative"), "{raw}");
    }

    #[test]
    fn test_html本文があればmultipart_alternativeになる() {
        let sender = SmtpNotificationSender::new(settings()).unwrap();

        let message = sender.build_message(&email(Some("<p>Hola</p>"))).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/alternative"), "{raw}");
    }

    #[test]
    fn test_不正な宛先はinvalid_address() {
        let sender = SmtpNotificationSender::new(settings()).unwrap();
        let mut email = email(None);
        email.to = "sin-arroba".to_string();

        assert!(matches!(
            sender.build_message(&email),
            Err(NotificationError::InvalidAddress(_))
        ));
    }
}
