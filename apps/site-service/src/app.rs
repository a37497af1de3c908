//! # ルーター構築
//!
//! ハンドラとミドルウェアを組み立てる。`main` と HTTP テストの両方から使う。
//!
//! ## ミドルウェア（外側から順）
//!
//! 1. `SetRequestIdLayer` - `x-request-id` を UUID v7 で採番（クライアント指定があれば優先）
//! 2. `TraceLayer` - リクエストスパン
//! 3. `PropagateRequestIdLayer` - レスポンスに `x-request-id` を付与
//! 4. `CatchPanicLayer` - panic を固定文言の 500 に変換
//! 5. `CorsLayer` - 許可リスト方式、credentials あり

use std::{any::Any, sync::Arc};

use axum::{
    Json,
    Router,
    body::Body,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rivasdev_shared::{
    ServerFaultResponse,
    event_log::error,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::ConfigError,
    handler::{
        ReadinessState,
        SubmissionState,
        health_check,
        list_contacts,
        list_reviews,
        not_found,
        readiness_check,
        root,
        submit_contact,
        submit_quotation,
        submit_review,
    },
};

/// CORS レイヤーを作成する
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                name:  "CORS_ALLOWED_ORIGINS",
                value: origin.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// アプリケーションのルーターを構築する
pub fn build_router(
    submissions: Arc<SubmissionState>,
    readiness: Arc<ReadinessState>,
    cors: CorsLayer,
) -> Router {
    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness);

    let submission_routes = Router::new()
        .route("/api/contact", post(submit_contact).get(list_contacts))
        .route("/api/quotation", post(submit_quotation))
        .route("/api/reviews", post(submit_review).get(list_reviews))
        .with_state(submissions);

    Router::new()
        .merge(health_routes)
        .merge(submission_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(cors),
        )
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(
        error.category = error::category::INFRASTRUCTURE,
        error.kind = error::kind::INTERNAL,
        "ハンドラで panic が発生: {}", detail
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerFaultResponse::default()),
    )
        .into_response()
}
