//! # Site Service ライブラリ
//!
//! サイトのフォーム送信 API（お問い合わせ・見積もり依頼・レビュー）。
//! HTTP テストからルーターを組み立てられるよう、内部モジュールを公開する。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
