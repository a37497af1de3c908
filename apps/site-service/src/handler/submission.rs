//! # 送信ハンドラ
//!
//! 3 つのエンドポイントをそれぞれの [`SubmissionPipeline`] に結び付ける薄い層。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /api/contact     → 200 {"message"}
//! GET  /api/contact     → 200 [保存済みお問い合わせ]
//! POST /api/quotation   → 200 {"message"}
//! POST /api/reviews     → 201 {"message", "review"}
//! GET  /api/reviews     → 200 [保存済みレビュー]
//! ```
//!
//! 本文が JSON として解釈できない場合も 400 を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use rivasdev_domain::{
    notification::NotificationError,
    submission::{
        ContactForm,
        ContactMessage,
        Quotation,
        QuotationForm,
        Review,
        ReviewForm,
        StoredSubmission,
        SubmissionForm,
        SubmissionKind,
        SubmissionRecord,
    },
};
use rivasdev_shared::{MessageResponse, event_log::error};
use serde::Serialize;

use crate::{
    error::ApiError,
    usecase::{SubmissionError, SubmissionPipeline},
};

/// 送信ハンドラの State
pub struct SubmissionState {
    pub contacts:   SubmissionPipeline<ContactMessage>,
    pub quotations: SubmissionPipeline<Quotation>,
    pub reviews:    SubmissionPipeline<Review>,
}

/// レビュー作成時のレスポンス
#[derive(Debug, Serialize)]
pub struct ReviewCreatedResponse {
    pub message: &'static str,
    pub review:  StoredSubmission<Review>,
}

/// 保存・通知に失敗したときの文言
fn failure_message(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::ContactMessage => "Hubo un error al enviar el mensaje",
        SubmissionKind::Quotation => "Hubo un error al procesar la cotización",
        SubmissionKind::Review => "Error al guardar la reseña",
    }
}

/// 一覧取得に失敗したときの文言
fn list_failure_message(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::ContactMessage => "Error al obtener los mensajes",
        SubmissionKind::Quotation => "Error al obtener las cotizaciones",
        SubmissionKind::Review => "Error al obtener las reseñas",
    }
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<Arc<SubmissionState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    run_submission(&state.contacts, payload).await?;
    Ok(Json(MessageResponse::new("Mensaje enviado con éxito")))
}

/// GET /api/contact
pub async fn list_contacts(
    State(state): State<Arc<SubmissionState>>,
) -> Result<Json<Vec<StoredSubmission<ContactMessage>>>, ApiError> {
    run_list(&state.contacts).await.map(Json)
}

/// POST /api/quotation
pub async fn submit_quotation(
    State(state): State<Arc<SubmissionState>>,
    payload: Result<Json<QuotationForm>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    run_submission(&state.quotations, payload).await?;
    Ok(Json(MessageResponse::new(
        "Cotización enviada con éxito y confirmación enviada al usuario",
    )))
}

/// POST /api/reviews
pub async fn submit_review(
    State(state): State<Arc<SubmissionState>>,
    payload: Result<Json<ReviewForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewCreatedResponse>), ApiError> {
    let review = run_submission(&state.reviews, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewCreatedResponse {
            message: "Reseña guardada con éxito",
            review,
        }),
    ))
}

/// GET /api/reviews
pub async fn list_reviews(
    State(state): State<Arc<SubmissionState>>,
) -> Result<Json<Vec<StoredSubmission<Review>>>, ApiError> {
    run_list(&state.reviews).await.map(Json)
}

async fn run_submission<R, F>(
    pipeline: &SubmissionPipeline<R>,
    payload: Result<Json<F>, JsonRejection>,
) -> Result<StoredSubmission<R>, ApiError>
where
    R: SubmissionRecord,
    F: SubmissionForm<Record = R>,
{
    let Json(form) = payload.map_err(|rejection| ApiError::BadRequest {
        detail: format!("Cuerpo de la solicitud inválido: {}", rejection.body_text()),
    })?;

    pipeline
        .submit(form)
        .await
        .map_err(|e| submission_failure(R::KIND, e))
}

async fn run_list<R: SubmissionRecord>(
    pipeline: &SubmissionPipeline<R>,
) -> Result<Vec<StoredSubmission<R>>, ApiError> {
    pipeline.list().await.map_err(|e| {
        tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::DATABASE,
            submission.kind = %R::KIND,
            span_trace = %e.span_trace(),
            "一覧取得に失敗: {}", e
        );
        ApiError::ServerFault {
            message: list_failure_message(R::KIND),
            reason:  e.reason(),
        }
    })
}

fn submission_failure(kind: SubmissionKind, err: SubmissionError) -> ApiError {
    let stage = err.stage();
    match err {
        SubmissionError::Validation(e) => ApiError::validation(&e),
        SubmissionError::Persistence(e) => {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::DATABASE,
                submission.kind = %kind,
                submission.stage = %stage,
                span_trace = %e.span_trace(),
                "送信レコードの保存に失敗: {}", e
            );
            ApiError::ServerFault {
                message: failure_message(kind),
                reason:  e.reason(),
            }
        }
        SubmissionError::Notification(e) => {
            let error_kind = match &e {
                NotificationError::TemplateFailed(_) => error::kind::TEMPLATE,
                _ => error::kind::SMTP,
            };
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error_kind,
                submission.kind = %kind,
                submission.stage = %stage,
                "通知メールの送信に失敗: {}", e
            );
            ApiError::ServerFault {
                message: failure_message(kind),
                reason:  e.reason().to_string(),
            }
        }
    }
}
