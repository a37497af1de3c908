//! # 通知
//!
//! フォーム送信に伴うメール通知のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`SubmissionNotification`] | 送信通知イベント | お問い合わせ受付・見積もり依頼受付 |
//! | [`NotificationAudience`] | 通知先区分 | 管理者 / 送信者本人 |
//! | [`EmailMessage`] | メールメッセージ | テンプレートレンダリングの出力 |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 通知を伴うレコード種別ごとにバリアントを持つ
//! - **同期・fail-fast**: 送信失敗は呼び出し元に返す（リトライしない）
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は site-service）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::submission::SubmissionKind;

/// 通知送信エラー
///
/// 各バリアントはトランスポートや tera が返した原因文字列を保持する。
/// API レスポンスには [`reason`](NotificationError::reason) を載せる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// メール送信に失敗（認証失敗・接続失敗・宛先拒否）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 送信元・宛先アドレスが不正
    #[error("メールアドレスが不正: {0}")]
    InvalidAddress(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// SMTP リレーへの接続確認に失敗
    #[error("SMTP 接続確認に失敗: {0}")]
    ConnectionCheckFailed(String),
}

impl NotificationError {
    /// 下位レイヤーが返した原因文字列
    pub fn reason(&self) -> &str {
        match self {
            Self::SendFailed(reason)
            | Self::InvalidAddress(reason)
            | Self::TemplateFailed(reason)
            | Self::ConnectionCheckFailed(reason) => reason,
        }
    }
}

/// 通知先区分
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationAudience {
    /// サイト管理者（固定宛先）
    Admin,
    /// フォームの送信者本人
    Submitter,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
/// 送信元アドレスは送信実装が保持し、ここでは表示名のみ指定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信者表示名（例: `"RivasDev"`）
    pub sender_name: String,
    /// 送信先メールアドレス
    pub to:          String,
    /// 件名
    pub subject:     String,
    /// プレーンテキスト本文
    pub text_body:   String,
    /// HTML 本文（rich テンプレート選択時のみ）
    pub html_body:   Option<String>,
}

/// 送信通知イベント
///
/// 管理者通知と送信者への受付確認の 2 通を生成する元データ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionNotification {
    /// お問い合わせ受付
    ContactReceived {
        name:    String,
        email:   String,
        message: String,
    },
    /// 見積もり依頼受付
    QuotationRequested {
        name:    String,
        email:   String,
        phone:   String,
        details: String,
    },
}

impl SubmissionNotification {
    /// 元になったレコード種別を返す
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Self::ContactReceived { .. } => SubmissionKind::ContactMessage,
            Self::QuotationRequested { .. } => SubmissionKind::Quotation,
        }
    }

    /// 送信者名を返す
    pub fn submitter_name(&self) -> &str {
        match self {
            Self::ContactReceived { name, .. } | Self::QuotationRequested { name, .. } => name,
        }
    }

    /// 送信者のメールアドレス（受付確認メールの宛先）を返す
    pub fn submitter_email(&self) -> &str {
        match self {
            Self::ContactReceived { email, .. } | Self::QuotationRequested { email, .. } => email,
        }
    }

    /// 受付確認メールで引用する自由記述
    pub fn echoed_text(&self) -> &str {
        match self {
            Self::ContactReceived { message, .. } => message,
            Self::QuotationRequested { details, .. } => details,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn make_contact() -> SubmissionNotification {
        SubmissionNotification::ContactReceived {
            name:    "Ana".to_string(),
            email:   "ana@example.com".to_string(),
            message: "Hola".to_string(),
        }
    }

    fn make_quotation() -> SubmissionNotification {
        SubmissionNotification::QuotationRequested {
            name:    "Luis".to_string(),
            email:   "luis@example.com".to_string(),
            phone:   "+52 555 000 0000".to_string(),
            details: "Tienda en línea".to_string(),
        }
    }

    #[test]
    fn kindが各バリアントで正しい値を返す() {
        assert_eq!(make_contact().kind(), SubmissionKind::ContactMessage);
        assert_eq!(make_quotation().kind(), SubmissionKind::Quotation);
    }

    #[test]
    fn submitter_emailが送信者のメールアドレスを返す() {
        assert_eq!(make_contact().submitter_email(), "ana@example.com");
        assert_eq!(make_quotation().submitter_email(), "luis@example.com");
    }

    #[test]
    fn echoed_textがお問い合わせではmessageを見積もりではdetailsを返す() {
        assert_eq!(make_contact().echoed_text(), "Hola");
        assert_eq!(make_quotation().echoed_text(), "Tienda en línea");
    }

    #[test]
    fn notification_audienceの文字列変換が正しい() {
        assert_eq!(NotificationAudience::Admin.to_string(), "admin");
        assert_eq!(NotificationAudience::Submitter.to_string(), "submitter");
        assert_eq!(
            NotificationAudience::from_str("submitter").unwrap(),
            NotificationAudience::Submitter
        );
    }

    #[test]
    fn reasonが原因文字列のみを返す() {
        let err = NotificationError::SendFailed("535 authentication failed".to_string());

        assert_eq!(err.reason(), "535 authentication failed");
        assert_eq!(err.to_string(), "メール送信に失敗: 535 authentication failed");
    }
}
