//! # メッセージレスポンス
//!
//! 公開 API のレスポンス形式 `{ "message": ..., "error": ... }` を提供する。
//!
//! ## 設計
//!
//! - フロントエンド（Vite 製サイト）が `message` をそのまま表示するため、
//!   成功・失敗どちらも `message` を必ず含める
//! - 失敗時の原因は `error` に入れる（成功時は省略）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// 成功・失敗共通のメッセージレスポンス
///
/// ## 使用例
///
/// ```
/// use rivasdev_shared::MessageResponse;
///
/// let response = MessageResponse::new("Mensaje enviado con éxito");
/// assert_eq!(response.message, "Mensaje enviado con éxito");
/// assert!(response.error.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error:   Option<String>,
}

impl MessageResponse {
    /// 成功メッセージを作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error:   None,
        }
    }

    /// 失敗原因付きのメッセージを作成する
    pub fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error:   Some(error.into()),
        }
    }
}

/// 予期しないサーバー障害時のレスポンス
///
/// panic などパイプライン外の障害で返す。内部情報を漏らさないよう
/// 本文は固定値にする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFaultResponse {
    pub error: String,
}

impl Default for ServerFaultResponse {
    fn default() -> Self {
        Self {
            error: "Ocurrió un error en el servidor.".to_string(),
        }
    }
}
