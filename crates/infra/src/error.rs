//! # インフラ層エラー
//!
//! [`InfraError`] は種別 [`InfraErrorKind`] と、生成時点の [`SpanTrace`] を持つ。
//! どの経路（`?` による `From` 変換・[`InfraError::unexpected`]）で作っても
//! SpanTrace が取られるので、ハンドラ側のログで保存処理のスパンまで辿れる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 接続失敗・タイムアウト・制約違反など sqlx が返したもの
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// JSONB ペイロードとレコード型の変換失敗
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    fn capture(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::capture(InfraErrorKind::Unexpected(msg.into()))
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 種別の接頭辞を除いた原因文字列（API レスポンスの `error` に載せる）
    pub fn reason(&self) -> String {
        match &self.kind {
            InfraErrorKind::Database(e) => e.to_string(),
            InfraErrorKind::Serialization(e) => e.to_string(),
            InfraErrorKind::Unexpected(msg) => msg.clone(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::capture(InfraErrorKind::Database(source))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self::capture(InfraErrorKind::Serialization(source))
    }
}
