//! # システムハンドラ（ユーザー区分・テストメール）
//!
//! - `GET /check-user-type`: 認証済みユーザーの区分を返す
//! - `POST /test-email`: メール送信機能の疎通確認

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kidlink_domain::{notification::EmailKind, user::Email, user_type::UserType};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::AuthContext,
    usecase::{EmailService, UserTypeError, UserTypeResolver},
};

/// テストメールで使用する固定トークン
const TEST_TOKEN: &str = "test-token";

/// システムハンドラの状態
pub struct SystemState {
    pub resolver:       UserTypeResolver,
    pub email_service:  EmailService,
    /// フロントエンドのベース URL（テストメールのリンク生成用）
    pub client_app_url: String,
}

/// `GET /check-user-type` のレスポンス
#[derive(Debug, Serialize)]
pub struct CheckUserTypeResponse {
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

/// GET /check-user-type
///
/// 認証済みユーザーの区分（`user` / `hotelOwner` / `systemAdmin`）を返す。
/// クライアントはこの値で画面遷移を振り分ける。
/// 未認証の場合は 401 を返す。
#[tracing::instrument(skip_all)]
pub async fn check_user_type(
    State(state): State<Arc<SystemState>>,
    auth: Option<Extension<AuthContext>>,
) -> Response {
    let (session, user) = match &auth {
        Some(Extension(ctx)) => (Some(&ctx.session), Some(&ctx.user)),
        None => (None, None),
    };

    match state.resolver.resolve(session, user).await {
        Ok(user_type) => {
            (StatusCode::OK, Json(CheckUserTypeResponse { user_type })).into_response()
        }
        Err(UserTypeError::Unauthorized) => ApiError::Unauthorized.into_response(),
    }
}

/// `POST /test-email` のリクエストボディ
#[derive(Debug, Deserialize)]
pub struct TestEmailRequest {
    /// 送信先メールアドレス
    pub to:   Option<String>,
    /// 送信するメールの種類（省略時は welcome）
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `POST /test-email` のレスポンス
#[derive(Debug, Serialize)]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: String,
}

/// POST /test-email
///
/// 指定した宛先にテストメールを送信する。
/// 送信結果は `{ success, message }` で返し、失敗時はステータス 500 になる。
#[tracing::instrument(skip_all)]
pub async fn test_email(
    State(state): State<Arc<SystemState>>,
    Json(request): Json<TestEmailRequest>,
) -> Response {
    let to = match request.to.as_deref().map(Email::new) {
        Some(Ok(email)) => email,
        _ => return ApiError::BadRequest("Invalid email address".to_string()).into_response(),
    };

    let kind = match request
        .kind
        .as_deref()
        .unwrap_or("welcome")
        .parse::<EmailKind>()
    {
        Ok(kind) => kind,
        Err(_) => return ApiError::BadRequest("Invalid email type".to_string()).into_response(),
    };

    let (success, message) = match kind {
        EmailKind::Welcome => {
            let success = state
                .email_service
                .send_welcome_email(&to, "Test User")
                .await;
            (
                success,
                if success {
                    "Welcome email sent successfully"
                } else {
                    "Failed to send welcome email"
                },
            )
        }
        EmailKind::PasswordReset => {
            let reset_url = format!(
                "{}/auth/reset-password?token={TEST_TOKEN}",
                state.client_app_url
            );
            let success = state
                .email_service
                .send_password_reset_email(&to, &reset_url, TEST_TOKEN)
                .await;
            (
                success,
                if success {
                    "Password reset email sent successfully"
                } else {
                    "Failed to send password reset email"
                },
            )
        }
        EmailKind::EmailVerification => {
            let verification_url = format!(
                "{}/auth/verify-email?token={TEST_TOKEN}",
                state.client_app_url
            );
            let success = state
                .email_service
                .send_email_verification_email(&to, &verification_url, TEST_TOKEN)
                .await;
            (
                success,
                if success {
                    "Email verification email sent successfully"
                } else {
                    "Failed to send email verification email"
                },
            )
        }
    };

    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(TestEmailResponse {
            success,
            message: message.to_string(),
        }),
    )
        .into_response()
}
