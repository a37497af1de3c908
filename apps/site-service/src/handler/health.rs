//! # ヘルスチェックハンドラ
//!
//! - `/` - 稼働確認用のプレーンテキスト
//! - `/health` - Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` - Readiness Check（DB の接続状態を確認）
//!
//! レスポンス型は [`rivasdev_shared::HealthResponse`] / [`rivasdev_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rivasdev_infra::health::HealthCheck;
use rivasdev_shared::{CheckStatus, HealthResponse, ReadinessResponse};

use crate::error::ApiError;

/// 各チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// `GET /` の本文
pub const ROOT_MESSAGE: &str = "✅ Servidor funcionando correctamente 🚀";

/// Readiness Check 用の State
pub struct ReadinessState {
    pub checks: Vec<Arc<dyn HealthCheck>>,
}

/// 稼働確認（プレーンテキスト）
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Liveness Check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = HashMap::new();
    for check in &state.checks {
        checks.insert(check.name().to_string(), run_check(check.as_ref()).await);
    }

    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

async fn run_check(check: &dyn HealthCheck) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, check.check()).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(check = check.name(), error = %e, "readiness check failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!(check = check.name(), "readiness check timed out");
            CheckStatus::Error
        }
    }
}

/// 未定義ルートのフォールバック
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
