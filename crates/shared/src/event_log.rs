//! # 構造化ログのフィールド規約
//!
//! 送信の受付や通知の結果は「ビジネスイベント」として、障害は
//! `error.category` / `error.kind` 付きの `tracing::error!` として出力する。
//! JSON 出力ではドット区切りのキーがそのままフラットに並ぶ。
//!
//! ```text
//! jq 'select(.["event.kind"] == "business_event" and .["event.result"] == "failure")'
//! ```

/// ビジネスイベントを info レベルで出力する
///
/// `event.kind = "business_event"` は自動で付く。
///
/// ## 必須フィールド
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（`SubmissionKind` の文字列表現）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const SUBMISSION: &str = "submission";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // 送信受付
        pub const SUBMISSION_REJECTED: &str = "submission.rejected";
        pub const SUBMISSION_PERSISTED: &str = "submission.persisted";
        pub const SUBMISSION_COMPLETED: &str = "submission.completed";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（SMTP リレー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const SMTP: &str = "smtp";
        pub const TEMPLATE: &str = "template";
        pub const INTERNAL: &str = "internal";
    }
}
