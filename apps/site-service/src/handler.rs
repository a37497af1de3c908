//! # HTTP ハンドラ
//!
//! - [`health`] - ルート・Liveness・Readiness
//! - [`submission`] - お問い合わせ・見積もり依頼・レビュー

pub mod health;
pub mod submission;

pub use health::{ReadinessState, health_check, not_found, readiness_check, root};
pub use submission::{
    ReviewCreatedResponse,
    SubmissionState,
    list_contacts,
    list_reviews,
    submit_contact,
    submit_quotation,
    submit_review,
};
