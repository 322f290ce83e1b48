//! システム API 統合テスト
//!
//! ルーター全体（セッション復元ミドルウェア + ハンドラ）を組み立て、
//! モックのリポジトリ・トランスポートでエンドツーエンドの挙動を検証する。
//!
//! ## テストケース
//!
//! - 未認証の /check-user-type は 401 を返し、メンバーシップ照会は行われない
//! - admin / アクティブ組織 / メンバーシップ / なし の各区分
//! - メンバーシップ照会失敗時の fail-open（user に縮退、200 を維持）
//! - /test-email の welcome / reset / verification / 不正 type / 送信失敗

use std::sync::Arc;

use axum::{
   Router,
   body::Body,
   http::{Method, Request, StatusCode},
};
use chrono::{DateTime, Utc};
use kidlink_api::{
   app::build_app,
   handler::SystemState,
   middleware::SessionState,
   usecase::{EmailService, TemplateRenderer, UserTypeResolver},
};
use kidlink_domain::{
   clock::FixedClock,
   notification::EmailBody,
   organization::{MemberRole, Membership, MembershipId, OrganizationId},
   session::{Session, SessionId},
   user::{Email, User, UserId, UserName, UserRole},
};
use kidlink_infra::mock::{
   MockMembershipRepository,
   MockNotificationSender,
   MockSessionRepository,
};
use tower::ServiceExt;

const APP_URL: &str = "http://localhost:3000";
const SESSION_TOKEN: &str = "test-session-token";

/// テスト用の固定現在時刻
fn fixed_now() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn make_user(role: UserRole) -> User {
   let now = fixed_now();
   User::from_db(
      UserId::new(),
      Email::new("user@example.com").unwrap(),
      UserName::new("Test User").unwrap(),
      role,
      true,
      now,
      now,
   )
}

fn make_session(user: &User, active_organization_id: Option<OrganizationId>) -> Session {
   Session::from_db(
      SessionId::new(),
      user.id().clone(),
      active_organization_id,
      fixed_now() + chrono::Duration::hours(8),
   )
}

fn make_membership(user: &User) -> Membership {
   Membership::from_db(
      MembershipId::new(),
      user.id().clone(),
      OrganizationId::new(),
      MemberRole::Owner,
      fixed_now(),
   )
}

/// テスト用アプリケーションを組み立てる
fn create_test_app(
   session_repository: MockSessionRepository,
   membership_repository: MockMembershipRepository,
   sender: MockNotificationSender,
) -> Router {
   let clock = Arc::new(FixedClock::new(fixed_now()));

   let email_service = EmailService::new(
      Arc::new(sender),
      TemplateRenderer::new().unwrap(),
      clock.clone(),
      APP_URL.to_string(),
      false,
   );
   let resolver = UserTypeResolver::new(Arc::new(membership_repository));

   let system_state = Arc::new(SystemState {
      resolver,
      email_service,
      client_app_url: APP_URL.to_string(),
   });
   let session_state = SessionState {
      session_repository: Arc::new(session_repository),
      clock,
   };

   build_app(system_state, session_state)
}

fn check_user_type_request(with_cookie: bool) -> Request<Body> {
   let mut builder = Request::builder()
      .method(Method::GET)
      .uri("/check-user-type");
   if with_cookie {
      builder = builder.header("Cookie", format!("kidlink_session={SESSION_TOKEN}"));
   }
   builder.body(Body::empty()).unwrap()
}

fn test_email_request(body: serde_json::Value) -> Request<Body> {
   Request::builder()
      .method(Method::POST)
      .uri("/test-email")
      .header("Content-Type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
   let body = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
   serde_json::from_slice(&body).unwrap()
}

// --- ヘルスチェック ---

#[tokio::test]
async fn test_healthは200を返す() {
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      MockNotificationSender::new(),
   );

   let request = Request::builder()
      .method(Method::GET)
      .uri("/health")
      .body(Body::empty())
      .unwrap();
   let response = sut.oneshot(request).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["status"], "healthy");
}

// --- /check-user-type ---

#[tokio::test]
async fn test_check_user_type_未認証で401() {
   // Given
   let membership_repository = MockMembershipRepository::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      membership_repository.clone(),
      MockNotificationSender::new(),
   );

   // When
   let response = sut.oneshot(check_user_type_request(false)).await.unwrap();

   // Then
   assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
   let json = response_json(response).await;
   assert_eq!(json["message"], "Unauthorized access");
   // 未認証のときメンバーシップ照会は行われない
   assert_eq!(membership_repository.lookup_count(), 0);
}

#[tokio::test]
async fn test_check_user_type_adminはsystem_admin() {
   // Given
   let session_repository = MockSessionRepository::new();
   let user = make_user(UserRole::Admin);
   session_repository.insert(SESSION_TOKEN, make_session(&user, None), user);
   let sut = create_test_app(
      session_repository,
      MockMembershipRepository::new(),
      MockNotificationSender::new(),
   );

   // When
   let response = sut.oneshot(check_user_type_request(true)).await.unwrap();

   // Then
   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["userType"], "systemAdmin");
}

#[tokio::test]
async fn test_check_user_type_アクティブ組織ありはhotel_owner() {
   let session_repository = MockSessionRepository::new();
   let user = make_user(UserRole::User);
   session_repository.insert(
      SESSION_TOKEN,
      make_session(&user, Some(OrganizationId::new())),
      user,
   );
   let sut = create_test_app(
      session_repository,
      MockMembershipRepository::new(),
      MockNotificationSender::new(),
   );

   let response = sut.oneshot(check_user_type_request(true)).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["userType"], "hotelOwner");
}

#[tokio::test]
async fn test_check_user_type_メンバーシップありはhotel_owner() {
   let session_repository = MockSessionRepository::new();
   let membership_repository = MockMembershipRepository::new();
   let user = make_user(UserRole::User);
   membership_repository.add_membership(make_membership(&user));
   session_repository.insert(SESSION_TOKEN, make_session(&user, None), user);
   let sut = create_test_app(
      session_repository,
      membership_repository,
      MockNotificationSender::new(),
   );

   let response = sut.oneshot(check_user_type_request(true)).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["userType"], "hotelOwner");
}

#[tokio::test]
async fn test_check_user_type_組織なしメンバーシップなしはuser() {
   let session_repository = MockSessionRepository::new();
   let user = make_user(UserRole::User);
   session_repository.insert(SESSION_TOKEN, make_session(&user, None), user);
   let sut = create_test_app(
      session_repository,
      MockMembershipRepository::new(),
      MockNotificationSender::new(),
   );

   let response = sut.oneshot(check_user_type_request(true)).await.unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["userType"], "user");
}

#[tokio::test]
async fn test_check_user_type_照会失敗はuserに縮退し200を維持する() {
   // Given: メンバーシップ照会が常に失敗する
   let session_repository = MockSessionRepository::new();
   let membership_repository = MockMembershipRepository::new();
   membership_repository.set_fail(true);
   let user = make_user(UserRole::User);
   session_repository.insert(SESSION_TOKEN, make_session(&user, None), user);
   let sut = create_test_app(
      session_repository,
      membership_repository,
      MockNotificationSender::new(),
   );

   // When
   let response = sut.oneshot(check_user_type_request(true)).await.unwrap();

   // Then: 5xx にならず user に縮退する
   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["userType"], "user");
}

// --- /test-email ---

#[tokio::test]
async fn test_test_email_welcomeが送信される() {
   let sender = MockNotificationSender::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender.clone(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "a@b.com",
         "type": "welcome"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["success"], true);
   assert_eq!(json["message"], "Welcome email sent successfully");

   let sent = sender.sent_emails();
   assert_eq!(sent.len(), 1);
   assert_eq!(sent[0].to, "a@b.com");
   assert_eq!(sent[0].subject, "Welcome to Kidlink! 🎉");
}

#[tokio::test]
async fn test_test_email_type省略時はwelcomeになる() {
   let sender = MockNotificationSender::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender.clone(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({ "to": "a@b.com" })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   assert_eq!(sender.sent_emails()[0].subject, "Welcome to Kidlink! 🎉");
}

#[tokio::test]
async fn test_test_email_resetの本文にテストトークンのリンクが含まれる() {
   let sender = MockNotificationSender::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender.clone(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "a@b.com",
         "type": "reset"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let json = response_json(response).await;
   assert_eq!(json["message"], "Password reset email sent successfully");

   let sent = sender.sent_emails();
   assert_eq!(sent.len(), 1);
   assert_eq!(sent[0].subject, "Reset Your Password - Kidlink");
   let EmailBody::Content { html, text } = &sent[0].body else {
      panic!("expected content body");
   };
   assert!(html.contains("reset-password?token=test-token"));
   assert!(text.contains("reset-password?token=test-token"));
}

#[tokio::test]
async fn test_test_email_verificationが送信される() {
   let sender = MockNotificationSender::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender.clone(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "a@b.com",
         "type": "verification"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::OK);
   let sent = sender.sent_emails();
   assert_eq!(sent[0].subject, "Verify Your Email Address - Kidlink");
   let EmailBody::Content { html, .. } = &sent[0].body else {
      panic!("expected content body");
   };
   assert!(html.contains("verify-email?token=test-token"));
}

#[tokio::test]
async fn test_test_email_不正なtypeは400() {
   let sender = MockNotificationSender::new();
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender.clone(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "a@b.com",
         "type": "bogus"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
   let json = response_json(response).await;
   assert_eq!(json["message"], "Invalid email type");
   assert!(sender.sent_emails().is_empty());
}

#[tokio::test]
async fn test_test_email_不正な宛先は400() {
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      MockNotificationSender::new(),
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "not-an-email",
         "type": "welcome"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::BAD_REQUEST);
   let json = response_json(response).await;
   assert_eq!(json["message"], "Invalid email address");
}

#[tokio::test]
async fn test_test_email_送信失敗時は500でsuccessがfalse() {
   let sender = MockNotificationSender::new();
   sender.set_fail(true);
   let sut = create_test_app(
      MockSessionRepository::new(),
      MockMembershipRepository::new(),
      sender,
   );

   let response = sut
      .oneshot(test_email_request(serde_json::json!({
         "to": "a@b.com",
         "type": "welcome"
      })))
      .await
      .unwrap();

   assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
   let json = response_json(response).await;
   assert_eq!(json["success"], false);
   assert_eq!(json["message"], "Failed to send welcome email");
}
