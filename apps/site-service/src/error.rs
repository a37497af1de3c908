//! # Site Service エラー定義
//!
//! パイプラインのエラーを HTTP レスポンスへ変換する。
//!
//! | エラー | HTTP ステータス | 本文 |
//! |-------|----------------|------|
//! | `BadRequest` | 400 | `{"message": "Todos los campos son obligatorios", "error": 詳細}` |
//! | `ServerFault` | 500 | `{"message": 種別ごとの文言, "error": 原因}` |
//! | `NotFound` | 404 | `{"message": "Ruta no encontrada"}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rivasdev_domain::DomainError;
use rivasdev_shared::MessageResponse;
use thiserror::Error;

/// 必須項目エラー時の固定メッセージ
pub const VALIDATION_MESSAGE: &str = "Todos los campos son obligatorios";

/// Site Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 不正なリクエスト（未入力・不正な JSON）
    #[error("不正なリクエスト: {detail}")]
    BadRequest { detail: String },

    /// サーバー側の失敗（保存・通知・一覧取得）
    #[error("{message}: {reason}")]
    ServerFault {
        /// 利用者向けの文言
        message: &'static str,
        /// 下位レイヤーが返した原因
        reason:  String,
    },

    /// 未定義のルート
    #[error("ルートが見つかりません")]
    NotFound,
}

impl ApiError {
    /// 検証エラーから 400 を作成する
    pub fn validation(error: &DomainError) -> Self {
        let detail = match error {
            DomainError::MissingField { field } => format!("Campo obligatorio: {field}"),
            DomainError::OutOfRange {
                field, min, max, ..
            } => format!("El campo {field} debe estar entre {min} y {max}"),
            DomainError::InvalidFormat { field, .. } => {
                format!("El campo {field} debe ser un número")
            }
        };
        Self::BadRequest { detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { detail } => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::with_error(VALIDATION_MESSAGE, detail)),
            )
                .into_response(),
            ApiError::ServerFault { message, reason } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::with_error(message, reason)),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new("Ruta no encontrada")),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(DomainError::MissingField { field: "email" }, "Campo obligatorio: email")]
    #[case(
        DomainError::OutOfRange { field: "rating", min: 1, max: 5, value: 7 },
        "El campo rating debe estar entre 1 y 5"
    )]
    #[case(
        DomainError::InvalidFormat { field: "rating", value: "x".to_string() },
        "El campo rating debe ser un número"
    )]
    fn test_検証エラーの詳細文言(#[case] error: DomainError, #[case] expected: &str) {
        let ApiError::BadRequest { detail } = ApiError::validation(&error) else {
            panic!("BadRequest であること");
        };
        assert_eq!(detail, expected);
    }

    #[test]
    fn test_server_faultは500を返す() {
        let response = ApiError::ServerFault {
            message: "Error al guardar la reseña",
            reason:  "pool timed out".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_foundは404を返す() {
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }
}
