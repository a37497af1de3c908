//! # RivasDev 共有ユーティリティ
//!
//! 公開 API のレスポンス形式とログ周りの共通部品。ビジネスロジックは置かない。
//!
//! tower-http / tracing-subscriber に依存する部分は `observability` feature の内側にある。

pub mod event_log;
pub mod health;
pub mod message_response;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
pub use message_response::{MessageResponse, ServerFaultResponse};
