//! # API アプリケーション構築
//!
//! DI（リポジトリ・サービス・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    handler::{SystemState, check_user_type, health_check, test_email},
    middleware::{SessionState, load_session},
};

/// ルーターを構築する
///
/// 構築済みの State を受け取り、ルート定義とミドルウェアを組み立てる。
/// セッション復元ミドルウェアは全ルートに適用される（認証必須かどうかは
/// 各ハンドラが判断する）。
pub fn build_app(system_state: Arc<SystemState>, session_state: SessionState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/check-user-type", get(check_user_type))
        .route("/test-email", post(test_email))
        .with_state(system_state)
        .layer(from_fn_with_state(session_state, load_session))
        .layer(TraceLayer::new_for_http())
}
