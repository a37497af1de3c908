//! # ヘルスチェックのレスポンス型
//!
//! `/health`（Liveness）と `/health/ready`（Readiness）が返す JSON。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `/health` の本文
///
/// ```
/// use rivasdev_shared::HealthResponse;
///
/// let body = serde_json::to_value(HealthResponse {
///     status:  "healthy".to_string(),
///     version: "0.1.0".to_string(),
/// })
/// .unwrap();
/// assert_eq!(body["status"], "healthy");
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status:  String,
    /// `CARGO_PKG_VERSION`
    pub version: String,
}

/// 依存先 1 件の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// `/health/ready` の本文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    /// チェック名 → 結果
    pub checks: HashMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 1 件でも `Error` があれば `NotReady`（0 件なら `Ready`）
    pub fn from_checks(checks: HashMap<String, CheckStatus>) -> Self {
        let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
