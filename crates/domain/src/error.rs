//! # ドメイン層エラー定義
//!
//! フォーム検証の失敗を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `MissingField` | 400 Bad Request | 必須項目が未入力（空文字・null・未指定・0） |
//! | `OutOfRange` | 400 Bad Request | 数値が許容範囲外 |
//! | `InvalidFormat` | 400 Bad Request | 数値として解釈できない |
//!
//! メッセージは運用者向け（ログ出力用）。利用者向けの文言は API 層で組み立てる。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 必須項目が未入力
    #[error("必須項目が未入力です: {field}")]
    MissingField {
        /// フィールド名（リクエスト JSON のキー）
        field: &'static str,
    },

    /// 数値が許容範囲外
    #[error("{field} は {min} 以上 {max} 以下である必要があります（入力値: {value}）")]
    OutOfRange {
        field: &'static str,
        min:   i64,
        max:   i64,
        value: i64,
    },

    /// 数値として解釈できない
    #[error("{field} の形式が不正です: {value}")]
    InvalidFormat { field: &'static str, value: String },
}

impl DomainError {
    /// 検証に失敗したフィールド名を返す
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}
