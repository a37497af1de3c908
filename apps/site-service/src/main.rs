//! # Site Service サーバー
//!
//! サイトのフォーム送信を受け付ける API サーバー。
//!
//! ## 役割
//!
//! - **お問い合わせ・見積もり依頼**: 保存したうえで管理者通知と受付確認メールを送信
//! - **レビュー**: 保存のみ。一覧はサイトに表示される
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` / `DATABASE_ACQUIRE_TIMEOUT_SECS` | No | 接続プール（デフォルト: `10` / `5`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp`（デフォルト）または `noop` |
//! | `SMTP_HOST` / `SMTP_PORT` / `SMTP_SECURITY` | No | SMTP リレー（デフォルト: `smtp.gmail.com:587`, `starttls`） |
//! | `EMAIL_USER` / `EMAIL_PASS` | smtp 時 **Yes** | 送信アカウント |
//! | `RECEIVER_EMAIL` | **Yes** | 管理者通知の宛先 |
//! | `NOTIFICATION_TEMPLATE` | No | 受付確認のスタイル（`plain` / `rich`） |
//! | `NOTIFICATION_SITE_URL` | No | メール内リンク |
//! | `CORS_ALLOWED_ORIGINS` | No | カンマ区切りの許可オリジン |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メールは送らない）
//! NOTIFICATION_BACKEND=noop cargo run -p rivasdev-site-service
//!
//! # 本番環境
//! DATABASE_URL=postgres://... EMAIL_USER=... EMAIL_PASS=... RECEIVER_EMAIL=... \
//!     cargo run -p rivasdev-site-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use rivasdev_domain::submission::{ContactMessage, Quotation, Review};
use rivasdev_infra::{
    db,
    health::{HealthCheck, PostgresHealthCheck},
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::PostgresSubmissionRepository,
};
use rivasdev_shared::observability::{TracingConfig, init_tracing};
use rivasdev_site_service::{
    app::{build_router, cors_layer},
    config::{NotificationBackend, NotificationConfig, SiteConfig},
    handler::{ReadinessState, SubmissionState},
    usecase::{SubmissionNotifier, SubmissionPipeline, TemplateRenderer},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("site-service");
    init_tracing(&tracing_config);

    let config = SiteConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        service = %tracing_config.service_name,
        "Site Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url, config.pool)
        .await
        .context("データベース接続に失敗しました")?;
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let sender = build_sender(&config.notification)?;
    spawn_connection_check(Arc::clone(&sender));

    let template_renderer = TemplateRenderer::new(
        config.notification.template_style,
        &config.notification.site_url,
    )
    .context("通知テンプレートの読み込みに失敗しました")?;
    let notifier = Arc::new(SubmissionNotifier::new(
        sender,
        template_renderer,
        &config.notification.receiver_email,
    ));

    let contact_repo = PostgresSubmissionRepository::<ContactMessage>::new(pool.clone());
    let quotation_repo = PostgresSubmissionRepository::<Quotation>::new(pool.clone());
    let review_repo = PostgresSubmissionRepository::<Review>::new(pool.clone());
    let submissions = Arc::new(SubmissionState {
        contacts:   SubmissionPipeline::new(Arc::new(contact_repo))
            .with_notifier(Arc::clone(&notifier)),
        quotations: SubmissionPipeline::new(Arc::new(quotation_repo)).with_notifier(notifier),
        // レビューは通知なし
        reviews:    SubmissionPipeline::new(Arc::new(review_repo)),
    });

    let database_check: Arc<dyn HealthCheck> = Arc::new(PostgresHealthCheck::new(pool));
    let readiness = Arc::new(ReadinessState {
        checks: vec![database_check],
    });

    let cors = cors_layer(&config.cors_allowed_origins)?;
    let app = build_router(submissions, readiness, cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} にバインドできません"))?;
    tracing::info!("Site Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("サーバーが異常終了しました")?;

    Ok(())
}

fn build_sender(config: &NotificationConfig) -> anyhow::Result<Arc<dyn NotificationSender>> {
    match (config.backend, &config.smtp) {
        (NotificationBackend::Smtp, Some(settings)) => {
            tracing::info!(
                host = %settings.host,
                port = settings.port,
                security = %settings.security,
                "通知バックエンド: SMTP"
            );
            let sender: Arc<dyn NotificationSender> = Arc::new(
                SmtpNotificationSender::new(settings.clone())
                    .context("SMTP 送信の初期化に失敗しました")?,
            );
            Ok(sender)
        }
        (NotificationBackend::Smtp, None) => {
            anyhow::bail!("NOTIFICATION_BACKEND=smtp には SMTP 設定が必要です")
        }
        (NotificationBackend::Noop, _) => {
            tracing::info!("通知バックエンド: Noop（メールは送信されません）");
            let sender: Arc<dyn NotificationSender> = Arc::new(NoopNotificationSender);
            Ok(sender)
        }
    }
}

/// SMTP リレーへの接続確認を起動処理と並行して行う
///
/// 失敗してもログに残すだけで、起動は継続する。
fn spawn_connection_check(sender: Arc<dyn NotificationSender>) {
    tokio::spawn(async move {
        match sender.verify_connection().await {
            Ok(()) => tracing::info!("SMTP トランスポートの接続を確認しました"),
            Err(e) => tracing::error!(
                error.category = rivasdev_shared::event_log::error::category::EXTERNAL_SERVICE,
                error.kind = rivasdev_shared::event_log::error::kind::SMTP,
                "SMTP トランスポートの接続確認に失敗: {}", e
            ),
        }
    });
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("シャットダウンします"),
        Err(e) => {
            tracing::error!("シグナルハンドラの登録に失敗: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
