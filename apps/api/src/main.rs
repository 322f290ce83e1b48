//! # Kidlink API サーバー
//!
//! マルチテナント SaaS「Kidlink」の公開 API サーバー。
//!
//! ## 役割
//!
//! - **ユーザー区分の解決**: 認証済みセッションからクライアント側
//!   ルーティング用の区分（`user` / `hotelOwner` / `systemAdmin`）を導出
//! - **メール通知**: パスワードリセット・メール検証・ウェルカムの
//!   トランザクショナルメール送出（Brevo / SMTP / Noop）
//!
//! 認証トークンの発行・検証は外部の認証基盤が担い、本サーバーは
//! セッション Cookie の照合結果のみを消費する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `APP_ENV` | No | 実行環境（デフォルト: `development`） |
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_LEVEL` | No | ログレベル（デフォルト: `info`） |
//! | `CLIENT_APP_URL` | No | フロントエンドのベース URL |
//! | `AUTH_BASE_URL` | No | 認証基盤のベース URL |
//! | `EMAIL_BACKEND` | No | `brevo` / `smtp` / `noop`（デフォルト: `noop`） |
//! | `BREVO_API_KEY` | brevo 時 | Brevo API キー |
//! | `EMAIL_SANDBOX_MODE` | No | `true` でサンドボックス送信 |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p kidlink-api
//!
//! # 本番環境
//! API_PORT=8000 DATABASE_URL=postgres://... EMAIL_BACKEND=brevo \
//!     BREVO_API_KEY=... cargo run -p kidlink-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use kidlink_api::{
   app::build_app,
   config::ApiConfig,
   handler::SystemState,
   middleware::SessionState,
   usecase::{EmailService, TemplateRenderer, UserTypeResolver},
};
use kidlink_domain::{clock::SystemClock, notification::EmailSender};
use kidlink_infra::{
   db,
   notification::{
      BrevoNotificationSender,
      NoopNotificationSender,
      NotificationSender,
      SmtpNotificationSender,
   },
   repository::{PostgresMembershipRepository, PostgresSessionRepository},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // 設定読み込み（不正な設定はここで非ゼロ終了する）
   let config = ApiConfig::from_env();

   // トレーシング初期化
   tracing_subscriber::registry()
      .with(
         tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{},kidlink=debug", config.log_level).into()),
      )
      .with(tracing_subscriber::fmt::layer())
      .init();

   tracing::info!(
      "API サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // データベース接続プールを作成
   let pool = db::create_pool(&config.database_url)
      .await
      .expect("データベース接続に失敗しました");
   tracing::info!("データベースに接続しました");

   // 通知トランスポートを初期化（プロセスで 1 度だけ構築して共有）
   let default_sender = EmailSender {
      name:    config.email.from_name.clone(),
      address: config.email.from_address.clone(),
   };
   let sender: Arc<dyn NotificationSender> = match config.email.backend.as_str() {
      "brevo" => {
         let api_key = config
            .email
            .brevo_api_key
            .clone()
            .expect("EMAIL_BACKEND=brevo には BREVO_API_KEY が必要です");
         Arc::new(BrevoNotificationSender::new(api_key, default_sender))
      }
      "smtp" => Arc::new(SmtpNotificationSender::new(
         &config.email.smtp_host,
         config.email.smtp_port,
         config.email.from_address.clone(),
      )),
      _ => Arc::new(NoopNotificationSender),
   };
   tracing::info!(backend = %config.email.backend, "通知トランスポートを初期化しました");

   // 依存コンポーネントを初期化
   let clock = Arc::new(SystemClock);
   let template_renderer =
      TemplateRenderer::new().expect("メールテンプレートの読み込みに失敗しました");
   let email_service = EmailService::new(
      sender,
      template_renderer,
      clock.clone(),
      config.client_app_url.clone(),
      config.sandbox_email_enabled(),
   );

   let membership_repository = Arc::new(PostgresMembershipRepository::new(pool.clone()));
   let resolver = UserTypeResolver::new(membership_repository);

   let system_state = Arc::new(SystemState {
      resolver,
      email_service,
      client_app_url: config.client_app_url.clone(),
   });

   let session_state = SessionState {
      session_repository: Arc::new(PostgresSessionRepository::new(pool)),
      clock,
   };

   // ルーター構築
   let app = build_app(system_state, session_state);

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .expect("アドレスのパースに失敗しました");

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("API サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
