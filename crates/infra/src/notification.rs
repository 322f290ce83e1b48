//! # 通知送信
//!
//! トランザクショナルメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: Brevo（本番用 HTTP API）、SMTP（Mailpit 開発用）、Noop（テスト用）
//! - **環境変数切替**: `EMAIL_BACKEND` でランタイム選択
//! - **リトライなし**: 1 回の呼び出しにつき 1 回のベストエフォート送信のみ。
//!   再送・バックオフ・キューイングは行わない

mod brevo;
mod noop;
mod smtp;

use async_trait::async_trait;
pub use brevo::BrevoNotificationSender;
use kidlink_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
/// Brevo / SMTP / Noop の 3 実装を環境変数で切り替える。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信し、プロバイダのメッセージ ID を返す
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError>;
}
