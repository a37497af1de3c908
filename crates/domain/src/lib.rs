//! # RivasDev ドメイン層
//!
//! サイトのフォーム送信（お問い合わせ・見積もり依頼・レビュー）を表現する
//! ドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **レコード種別ごとの型**: `ContactMessage` / `Quotation` / `Review` をそれぞれ型で表現し、
//!   送信パイプラインは [`submission::SubmissionRecord`] トレイトでこれらを一般化する
//! - **検証済みの値だけがレコードになる**: フォーム（未検証入力）からレコードへの変換は
//!   [`submission::SubmissionForm::validate`] のみで行う
//! - **インフラ非依存**: DB や SMTP の詳細には一切依存しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! site-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層エラー
//! - [`notification`] - メール通知のドメインモデル
//! - [`submission`] - 送信レコード・フォーム・検証

pub mod clock;
pub mod error;
pub mod notification;
pub mod submission;

pub use error::DomainError;
