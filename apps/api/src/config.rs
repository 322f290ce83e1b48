//! # API 設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! 必須項目の欠落や不正な値は起動時に検出し、プロセスを
//! 非ゼロ終了させる（不正な設定のまま起動しない）。

use std::env;

use url::Url;

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
   /// 実行環境（"development" | "production"）
   pub app_env: String,
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// データベース接続 URL
   pub database_url: String,
   /// ログレベル（EnvFilter のデフォルトディレクティブ）
   pub log_level: String,
   /// フロントエンドアプリケーションのベース URL（メール内リンク用）
   pub client_app_url: String,
   /// 認証基盤のベース URL
   pub auth_base_url: String,
   /// メール通知設定
   pub email: EmailConfig,
}

/// メール通知機能の設定
///
/// `EMAIL_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `brevo`: Brevo トランザクショナルメール API 経由で送信（本番）
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct EmailConfig {
   /// 送信バックエンド（"brevo" | "smtp" | "noop"）
   pub backend:       String,
   /// Brevo API キー（backend=brevo の場合は必須）
   pub brevo_api_key: Option<String>,
   /// SMTP ホスト（backend=smtp の場合に使用）
   pub smtp_host:     String,
   /// SMTP ポート（backend=smtp の場合に使用）
   pub smtp_port:     u16,
   /// 送信元表示名
   pub from_name:     String,
   /// 送信元メールアドレス
   pub from_address:  String,
   /// サンドボックスモード
   ///
   /// 有効時は送信メッセージに `sandbox` タグを付与し、
   /// トランスポート呼び出し前に診断ログを出す。
   pub sandbox_mode:  bool,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Self {
      Self {
         app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
         host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
         port: env::var("API_PORT")
            .expect("API_PORT が設定されていません")
            .parse()
            .expect("API_PORT は有効なポート番号である必要があります"),
         database_url: env::var("DATABASE_URL").expect("DATABASE_URL が設定されていません"),
         log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
         client_app_url: validated_base_url(
            "CLIENT_APP_URL",
            env::var("CLIENT_APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
         ),
         auth_base_url: validated_base_url(
            "AUTH_BASE_URL",
            env::var("AUTH_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
         ),
         email: EmailConfig::from_env(),
      }
   }

   /// サンドボックス送信を有効にするか
   ///
   /// 本番環境以外、または明示的なフラグが立っている場合に有効。
   pub fn sandbox_email_enabled(&self) -> bool {
      self.app_env != "production" || self.email.sandbox_mode
   }
}

impl EmailConfig {
   /// 環境変数からメール設定を読み込む
   fn from_env() -> Self {
      let backend = env::var("EMAIL_BACKEND").unwrap_or_else(|_| "noop".to_string());

      let brevo_api_key = env::var("BREVO_API_KEY").ok();
      if backend == "brevo" && brevo_api_key.is_none() {
         panic!("EMAIL_BACKEND=brevo には BREVO_API_KEY が必要です");
      }

      Self {
         backend,
         brevo_api_key,
         smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
         smtp_port: env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("SMTP_PORT は有効なポート番号である必要があります"),
         from_name: env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Kidlink".to_string()),
         from_address: env::var("EMAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "noreply@kidlink.com".to_string()),
         sandbox_mode: env::var("EMAIL_SANDBOX_MODE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
      }
   }
}

/// ベース URL を検証し、末尾スラッシュを除いた文字列を返す
///
/// パスの連結（`{base}/auth/reset-password?...`）で二重スラッシュに
/// ならないよう、末尾の `/` は落とす。
fn validated_base_url(name: &str, value: String) -> String {
   if let Err(e) = Url::parse(&value) {
      panic!("{name} が不正な URL です: {e}");
   }
   value.trim_end_matches('/').to_string()
}
