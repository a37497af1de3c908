//! # リポジトリ実装
//!
//! 送信レコードの永続化を担当する。
//!
//! - **依存性逆転**: パイプラインはトレイト経由でストアにアクセスする
//! - **テスタビリティ**: `mock::InMemorySubmissionRepository` に差し替え可能

pub mod submission_repository;

pub use submission_repository::{PostgresSubmissionRepository, SubmissionRepository};
