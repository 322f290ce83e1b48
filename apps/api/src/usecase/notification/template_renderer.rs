//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **決定的なレンダリング**: 入力 + 西暦年（フッターの著作権表記）のみに
//!   依存し、同じ入力からは常に同じ出力が得られる
//! - **有効期限の文言はコピーのみ**: 「1 時間で失効」等はメール本文上の
//!   記述であり、実際の失効処理は認証基盤の責務

use kidlink_domain::notification::{AccountNotification, EmailMessage, NotificationError};
use tera::{Context, Tera};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`AccountNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "password_reset.html",
                    include_str!("../../../templates/notifications/password_reset.html"),
                ),
                (
                    "password_reset.txt",
                    include_str!("../../../templates/notifications/password_reset.txt"),
                ),
                (
                    "email_verification.html",
                    include_str!("../../../templates/notifications/email_verification.html"),
                ),
                (
                    "email_verification.txt",
                    include_str!("../../../templates/notifications/email_verification.txt"),
                ),
                (
                    "welcome.html",
                    include_str!("../../../templates/notifications/welcome.html"),
                ),
                (
                    "welcome.txt",
                    include_str!("../../../templates/notifications/welcome.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `notification`: アカウント通知イベント
    /// - `app_url`: フロントエンドのベース URL（例: `http://localhost:3000`）
    /// - `year`: フッターの著作権表記に使う西暦年（Clock から注入）
    pub fn render(
        &self,
        notification: &AccountNotification,
        app_url: &str,
        year: i32,
    ) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) =
            Self::build_template_params(notification, app_url, year);

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage::content(
            notification.recipient_email(),
            subject,
            html_body,
            text_body,
        ))
    }

    /// テンプレート名、件名、コンテキストを構築する
    fn build_template_params(
        notification: &AccountNotification,
        app_url: &str,
        year: i32,
    ) -> (String, String, Context) {
        let mut context = Context::new();
        context.insert("app_url", app_url);
        context.insert("year", &year);

        let (template_name, subject) = match notification {
            AccountNotification::PasswordReset {
                reset_url, token, ..
            } => {
                context.insert("reset_url", reset_url);
                context.insert("token", token);
                (
                    "password_reset".to_string(),
                    "Reset Your Password - Kidlink".to_string(),
                )
            }
            AccountNotification::EmailVerification {
                verification_url,
                token,
                ..
            } => {
                context.insert("verification_url", verification_url);
                context.insert("token", token);
                (
                    "email_verification".to_string(),
                    "Verify Your Email Address - Kidlink".to_string(),
                )
            }
            AccountNotification::Welcome { user_name, .. } => {
                context.insert("user_name", user_name);
                (
                    "welcome".to_string(),
                    "Welcome to Kidlink! 🎉".to_string(),
                )
            }
        };

        (template_name, subject, context)
    }
}

#[cfg(test)]
mod tests {
    use kidlink_domain::notification::EmailBody;
    use pretty_assertions::assert_eq;

    use super::*;

    const APP_URL: &str = "http://localhost:3000";
    const YEAR: i32 = 2025;

    fn render(notification: &AccountNotification) -> (String, String, String, String) {
        let renderer = TemplateRenderer::new().unwrap();
        let email = renderer.render(notification, APP_URL, YEAR).unwrap();
        let EmailBody::Content { html, text } = email.body else {
            panic!("expected content body");
        };
        (email.to, email.subject, html, text)
    }

    #[test]
    fn test_newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn test_password_resetのレンダリングが正しい() {
        let notification = AccountNotification::PasswordReset {
            recipient_email: "user@example.com".to_string(),
            reset_url:       format!("{APP_URL}/auth/reset-password?token=test-token"),
            token:           "test-token".to_string(),
        };

        let (to, subject, html, text) = render(&notification);

        assert_eq!(to, "user@example.com");
        assert_eq!(subject, "Reset Your Password - Kidlink");
        assert!(html.contains("reset-password?token=test-token"));
        // テキスト形式は同じ URL に加えて生トークンを含む
        assert!(text.contains("reset-password?token=test-token"));
        assert!(text.contains("Token: test-token"));
        // 有効期限の文言（コピーのみ）
        assert!(html.contains("expire in 1 hour"));
        assert!(text.contains("expire in 1 hour"));
    }

    #[test]
    fn test_email_verificationのレンダリングが正しい() {
        let notification = AccountNotification::EmailVerification {
            recipient_email:  "user@example.com".to_string(),
            verification_url: format!("{APP_URL}/auth/verify-email?token=test-token"),
            token:            "test-token".to_string(),
        };

        let (to, subject, html, text) = render(&notification);

        assert_eq!(to, "user@example.com");
        assert_eq!(subject, "Verify Your Email Address - Kidlink");
        assert!(html.contains("verify-email?token=test-token"));
        assert!(text.contains("Token: test-token"));
        assert!(html.contains("expire in 24 hours"));
        assert!(text.contains("expire in 24 hours"));
    }

    #[test]
    fn test_welcomeのレンダリングが正しい() {
        let notification = AccountNotification::Welcome {
            recipient_email: "user@example.com".to_string(),
            user_name:       "Test User".to_string(),
        };

        let (to, subject, html, text) = render(&notification);

        assert_eq!(to, "user@example.com");
        assert_eq!(subject, "Welcome to Kidlink! 🎉");
        assert!(html.contains("Test User"));
        // CTA リンクはアプリケーションのベース URL を指す
        assert!(html.contains(&format!("href=\"{APP_URL}\"")));
        assert!(text.contains(APP_URL));
    }

    #[test]
    fn test_フッターに注入した西暦年が含まれる() {
        let notification = AccountNotification::Welcome {
            recipient_email: "user@example.com".to_string(),
            user_name:       "Test User".to_string(),
        };

        let (_, _, html, text) = render(&notification);

        assert!(html.contains("2025 Kidlink. All rights reserved."));
        assert!(text.contains("2025 Kidlink. All rights reserved."));
    }

    #[test]
    fn test_レンダリングは決定的() {
        let notification = AccountNotification::Welcome {
            recipient_email: "user@example.com".to_string(),
            user_name:       "Test User".to_string(),
        };
        let renderer = TemplateRenderer::new().unwrap();

        let first = renderer.render(&notification, APP_URL, YEAR).unwrap();
        let second = renderer.render(&notification, APP_URL, YEAR).unwrap();

        assert_eq!(first, second);
    }
}
