//! # API エラー定義
//!
//! API 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | レスポンスボディ |
//! |-----------|----------------|----------------|
//! | `Unauthorized` | 401 | `{"message": "Unauthorized access"}` |
//! | `BadRequest` | 400 | `{"message": <利用者向け文言>}` |
//! | `Internal` | 500 | `{"message": "Internal server error"}` |
//!
//! 内部エラーの詳細はログにのみ出力し、レスポンスボディには含めない。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use kidlink_shared::ErrorMessage;
use thiserror::Error;

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 認証されていない（セッション・ユーザーがコンテキストに存在しない）
   #[error("認証されていません")]
   Unauthorized,

   /// 不正なリクエスト
   ///
   /// メッセージはそのままレスポンスボディに載るため、
   /// 利用者向けの英語文言を渡すこと。
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, ErrorMessage::unauthorized()),
         ApiError::BadRequest(msg) => {
            (StatusCode::BAD_REQUEST, ErrorMessage::bad_request(msg.clone()))
         }
         ApiError::Internal(msg) => {
            tracing::error!("内部エラー: {}", msg);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorMessage::internal_error(),
            )
         }
      };

      (status, Json(body)).into_response()
   }
}
