//! # セッション復元ミドルウェア
//!
//! セッション Cookie を照合し、認証コンテキストをリクエスト
//! エクステンションに格納する。
//!
//! ## 設計方針
//!
//! - **認証は任意**: セッションが無い・失効している・照合に失敗した
//!   リクエストも未認証のままハンドラに到達させる。
//!   認証必須かどうかの判断は各ハンドラの責務
//! - **失効判定は注入時刻で行う**: `Clock` 経由で現在時刻を取得する

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use kidlink_domain::{clock::Clock, session::Session, user::User};
use kidlink_infra::repository::SessionRepository;

/// セッション Cookie 名
///
/// 認証基盤が `Set-Cookie` で発行する名前と一致させること。
pub const SESSION_COOKIE_NAME: &str = "kidlink_session";

/// 認証コンテキスト
///
/// 認証済みリクエストのエクステンションに格納される。
/// 未認証リクエストには格納されない（`Option<Extension<AuthContext>>`
/// で取り出す）。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: Session,
    pub user:    User,
}

/// セッション復元ミドルウェアの状態
#[derive(Clone)]
pub struct SessionState {
    pub session_repository: Arc<dyn SessionRepository>,
    pub clock:              Arc<dyn Clock>,
}

/// セッション復元ミドルウェア
///
/// Cookie のセッショントークンを照合し、有効なセッションであれば
/// `AuthContext` をリクエストエクステンションに格納する。
/// 照合エラーはログに残し、未認証として処理を継続する。
pub async fn load_session(
    State(state): State<SessionState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        match state.session_repository.find_by_token(cookie.value()).await {
            Ok(Some((session, user))) => {
                if session.is_expired(state.clock.now()) {
                    tracing::debug!(session_id = %session.id(), "失効したセッション");
                } else {
                    request.extensions_mut().insert(AuthContext { session, user });
                }
            }
            Ok(None) => {
                tracing::debug!("未知のセッショントークン");
            }
            Err(e) => {
                // セッション照合の失敗でリクエスト自体は落とさない
                tracing::warn!(error = %e, "セッション照合に失敗。未認証として継続する");
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        middleware::from_fn_with_state,
        response::IntoResponse,
        routing::get,
    };
    use chrono::{DateTime, Utc};
    use kidlink_domain::{
        clock::FixedClock,
        session::SessionId,
        user::{Email, UserId, UserName, UserRole},
    };
    use kidlink_infra::mock::MockSessionRepository;
    use tower::ServiceExt;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn make_user() -> User {
        let now = fixed_now();
        User::from_db(
            UserId::new(),
            Email::new("user@example.com").unwrap(),
            UserName::new("Test User").unwrap(),
            UserRole::User,
            true,
            now,
            now,
        )
    }

    /// 認証状態を返すテスト用ハンドラ
    async fn probe_handler(auth: Option<Extension<AuthContext>>) -> impl IntoResponse {
        match auth {
            Some(_) => StatusCode::OK,
            None => StatusCode::UNAUTHORIZED,
        }
    }

    fn create_test_app(repository: MockSessionRepository) -> Router {
        let state = SessionState {
            session_repository: Arc::new(repository),
            clock:              Arc::new(FixedClock::new(fixed_now())),
        };

        Router::new()
            .route("/probe", get(probe_handler))
            .layer(from_fn_with_state(state, load_session))
    }

    fn make_request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri("/probe");
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_有効なセッションで認証コンテキストが格納される() {
        // Given
        let repository = MockSessionRepository::new();
        let user = make_user();
        let session = Session::from_db(
            SessionId::new(),
            user.id().clone(),
            None,
            fixed_now() + chrono::Duration::hours(8),
        );
        repository.insert("valid-token", session, user);
        let sut = create_test_app(repository);

        // When
        let response = sut
            .oneshot(make_request(Some("kidlink_session=valid-token")))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cookieなしは未認証のまま通過する() {
        let sut = create_test_app(MockSessionRepository::new());

        let response = sut.oneshot(make_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_未知のトークンは未認証のまま通過する() {
        let sut = create_test_app(MockSessionRepository::new());

        let response = sut
            .oneshot(make_request(Some("kidlink_session=unknown")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_失効したセッションは未認証のまま通過する() {
        let repository = MockSessionRepository::new();
        let user = make_user();
        let session = Session::from_db(
            SessionId::new(),
            user.id().clone(),
            None,
            fixed_now() - chrono::Duration::seconds(1),
        );
        repository.insert("expired-token", session, user);
        let sut = create_test_app(repository);

        let response = sut
            .oneshot(make_request(Some("kidlink_session=expired-token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
