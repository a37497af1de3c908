//! # Site Service 設定
//!
//! 環境変数から設定を読み込む。`.env` は `main` で読み込み済みとする。

use std::{env, str::FromStr, time::Duration};

use rivasdev_infra::{
    db::PoolSettings,
    notification::{SmtpCredentials, SmtpSecurity, SmtpSettings},
};
use thiserror::Error;

use crate::usecase::SubmitterTemplateStyle;

const DEFAULT_CORS_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,https://rivasdev.vercel.app,https://rivasdev.com,https://www.rivasdev.com";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Site Service の設定
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// バインドアドレス
    pub host:                 String,
    /// ポート番号
    pub port:                 u16,
    /// データベース接続 URL
    pub database_url:         String,
    /// 接続プール設定
    pub pool:                 PoolSettings,
    /// 通知設定
    pub notification:         NotificationConfig,
    /// CORS で許可するオリジン
    pub cors_allowed_origins: Vec<String>,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationBackend {
    /// SMTP リレー経由で送信
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:        NotificationBackend,
    /// SMTP 接続設定（backend=smtp の場合のみ）
    pub smtp:           Option<SmtpSettings>,
    /// 管理者通知の宛先
    pub receiver_email: String,
    /// 受付確認メールのスタイル
    pub template_style: SubmitterTemplateStyle,
    /// メール内リンクのサイト URL
    pub site_url:       String,
}

impl SiteConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        Ok(Self {
            host:                 vars.or("HOST", "0.0.0.0"),
            port:                 vars.parse_or("PORT", 5000)?,
            database_url:         vars.required("DATABASE_URL")?,
            pool:                 PoolSettings {
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout: Duration::from_secs(
                    vars.parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
                ),
            },
            notification:         NotificationConfig::from_vars(&vars)?,
            cors_allowed_origins: vars
                .or("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ALLOWED_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl NotificationConfig {
    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let backend = vars.parse_or("NOTIFICATION_BACKEND", NotificationBackend::Smtp)?;

        let smtp = match backend {
            NotificationBackend::Smtp => {
                let username = vars.required("EMAIL_USER")?;
                let password = vars.required("EMAIL_PASS")?;
                Some(SmtpSettings {
                    host:         vars.or("SMTP_HOST", "smtp.gmail.com"),
                    port:         vars.parse_or("SMTP_PORT", 587)?,
                    security:     vars.parse_or("SMTP_SECURITY", SmtpSecurity::StartTls)?,
                    from_address: username.clone(),
                    credentials:  Some(SmtpCredentials { username, password }),
                })
            }
            NotificationBackend::Noop => None,
        };

        Ok(Self {
            backend,
            smtp,
            receiver_email: vars.required("RECEIVER_EMAIL")?,
            template_style: vars.parse_or("NOTIFICATION_TEMPLATE", SubmitterTemplateStyle::Plain)?,
            site_url: vars.or("NOTIFICATION_SITE_URL", "https://rivasdev.com"),
        })
    }
}

/// 空文字列を未設定として扱う環境変数アクセサ
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }
}
