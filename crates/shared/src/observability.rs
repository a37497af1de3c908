//! # Observability 基盤
//!
//! ログ出力の初期化と、リクエスト単位の相関 ID を扱う。
//!
//! | 環境変数 | 説明 |
//! |----------|------|
//! | `LOG_FORMAT` | `json`（本番）/ `pretty`（開発、デフォルト） |
//! | `RUST_LOG` | フィルタ。未設定なら [`DEFAULT_FILTER`] |

use std::str::FromStr;

use strum::{Display, EnumString};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,rivasdev=debug,tower_http=info";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON
    Json,
    #[default]
    Pretty,
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// サービス名（起動ログに付与する）
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み取る
    ///
    /// `LOG_FORMAT` が解釈できない場合は Pretty にし、stderr に警告を出す
    /// （この時点ではまだ subscriber が無い）。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => LogFormat::from_str(raw.trim()).unwrap_or_else(|_| {
                eprintln!("WARNING: LOG_FORMAT={raw:?} は不明な値のため pretty で出力します");
                LogFormat::Pretty
            }),
        };
        Self::new(service_name, log_format)
    }
}

/// グローバル subscriber を登録する
///
/// `tracing_error::ErrorLayer` を含めるため、`InfraError` が生成時の
/// SpanTrace を取得できる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let output = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// `x-request-id` を UUID v7 で採番する
///
/// クライアントが付けてきた ID は `SetRequestIdLayer` がそのまま使う。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        http::HeaderValue::try_from(uuid::Uuid::now_v7().to_string())
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// `TraceLayer` 用のリクエストスパン
///
/// `SetRequestIdLayer` の内側で呼ばれる前提。ID が無ければ `-` を記録する。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
