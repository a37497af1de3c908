//! # ユースケース層
//!
//! フォーム送信の検証 → 保存 → 通知を統合する。
//!
//! - [`submission`] - 送信パイプライン
//! - [`notification`] - 通知メールの生成と送信

pub mod notification;
pub mod submission;

pub use notification::{SubmissionNotifier, SubmitterTemplateStyle, TemplateRenderer};
pub use submission::{SubmissionError, SubmissionPipeline, SubmissionStage};
