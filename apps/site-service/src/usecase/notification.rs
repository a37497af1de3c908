//! # 通知ユースケース
//!
//! フォーム送信に伴うメール通知の生成と送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - 管理者通知 → 受付確認の順で送信する通知サービス

pub mod service;
pub mod template_renderer;

pub use service::SubmissionNotifier;
pub use template_renderer::{SubmitterTemplateStyle, TemplateRenderer};
