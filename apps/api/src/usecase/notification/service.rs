//! # メール通知サービス
//!
//! テンプレートレンダリング → トランスポート呼び出しを統合するサービス。
//!
//! ## 設計方針
//!
//! - **bool への正規化**: `send()` は成功/失敗を bool で返し、
//!   エラーを呼び出し元に伝播させない（ログ出力のみ）。
//!   呼び出し元は bool でのみ分岐する
//! - **サンドボックスモード**: 有効時はメッセージに `sandbox` タグを付与し、
//!   トランスポート呼び出し前に診断ログを出す。呼び出し自体は行われ、
//!   戻り値は配信ではなくトランスポート呼び出しの成否を表す
//! - **リトライなし**: 1 回の呼び出しにつき 1 回のベストエフォート送信のみ

use std::sync::Arc;

use kidlink_domain::{
    clock::Clock,
    notification::{AccountNotification, EmailMessage},
    user::Email,
};
use kidlink_infra::notification::NotificationSender;

use super::TemplateRenderer;

/// メール通知サービス
///
/// 通知メールの送出フローを統合する。依存（トランスポート、Clock）は
/// プロセス起動時に構築され、Arc で注入される。
pub struct EmailService {
    sender: Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    clock: Arc<dyn Clock>,
    client_app_url: String,
    sandbox_mode: bool,
}

impl EmailService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        clock: Arc<dyn Clock>,
        client_app_url: String,
        sandbox_mode: bool,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            clock,
            client_app_url,
            sandbox_mode,
        }
    }

    /// メールを送信する
    ///
    /// トランスポート呼び出しの成否を bool で返す。
    /// エラーはログに記録され、呼び出し元には伝播しない。
    pub async fn send(&self, mut email: EmailMessage) -> bool {
        if self.sandbox_mode {
            email.tags.push("sandbox".to_string());
            tracing::info!(
                to = %email.to,
                subject = %email.subject,
                "サンドボックスモードで送信する（実際の配信は保証されない）"
            );
        }

        match self.sender.send_email(&email).await {
            Ok(message_id) => {
                tracing::info!(
                    message_id = %message_id,
                    to = %email.to,
                    subject = %email.subject,
                    "メール送信成功"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    to = %email.to,
                    subject = %email.subject,
                    "メール送信失敗"
                );
                false
            }
        }
    }

    /// パスワードリセットメールを送信する
    pub async fn send_password_reset_email(
        &self,
        to: &Email,
        reset_url: &str,
        token: &str,
    ) -> bool {
        self.render_and_send(AccountNotification::PasswordReset {
            recipient_email: to.as_str().to_string(),
            reset_url:       reset_url.to_string(),
            token:           token.to_string(),
        })
        .await
    }

    /// メールアドレス検証メールを送信する
    pub async fn send_email_verification_email(
        &self,
        to: &Email,
        verification_url: &str,
        token: &str,
    ) -> bool {
        self.render_and_send(AccountNotification::EmailVerification {
            recipient_email:  to.as_str().to_string(),
            verification_url: verification_url.to_string(),
            token:            token.to_string(),
        })
        .await
    }

    /// ウェルカムメールを送信する
    pub async fn send_welcome_email(&self, to: &Email, user_name: &str) -> bool {
        self.render_and_send(AccountNotification::Welcome {
            recipient_email: to.as_str().to_string(),
            user_name:       user_name.to_string(),
        })
        .await
    }

    /// テンプレートをレンダリングして送信する
    ///
    /// レンダリング失敗も送信失敗と同様に false に正規化する。
    async fn render_and_send(&self, notification: AccountNotification) -> bool {
        let email = match self.template_renderer.render(
            &notification,
            &self.client_app_url,
            self.clock.current_year(),
        ) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = %notification.kind(),
                    "通知テンプレートのレンダリングに失敗"
                );
                return false;
            }
        };

        self.send(email).await
    }
}
