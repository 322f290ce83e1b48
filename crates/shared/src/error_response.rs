//! # エラーレスポンス
//!
//! 公開 API の統一エラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorMessage` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は api クレートの責務（shared に axum 依存を入れない）
//! - よく使うエラー種別は便利コンストラクタで提供し、メッセージ文字列の
//!   ハードコードを API ハンドラから排除する
//! - クライアントは `{ "message": ... }` の形状に依存しているため、
//!   フィールド構成を変更しないこと

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// すべての公開 API エンドポイントのエラーは `{ "message": ... }`
/// 形式で返される。メッセージは利用者向けの英語文言であり、
/// 内部エラーの詳細は含めない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
   pub message: String,
}

impl ErrorMessage {
   /// 汎用コンストラクタ
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
      }
   }

   /// 401 Unauthorized 用の定型メッセージ
   pub fn unauthorized() -> Self {
      Self::new("Unauthorized access")
   }

   /// 400 Bad Request 用のメッセージ
   pub fn bad_request(detail: impl Into<String>) -> Self {
      Self::new(detail)
   }

   /// 500 Internal Server Error 用の定型メッセージ
   ///
   /// detail は固定値（内部情報を漏らさないため）。
   pub fn internal_error() -> Self {
      Self::new("Internal server error")
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_jsonシリアライズでフィールド名が正しい() {
      let error = ErrorMessage::new("Something went wrong");
      let json = serde_json::to_value(&error).unwrap();

      assert_eq!(json, serde_json::json!({ "message": "Something went wrong" }));
   }

   #[test]
   fn test_unauthorized_は定型メッセージを返す() {
      assert_eq!(ErrorMessage::unauthorized().message, "Unauthorized access");
   }

   #[test]
   fn test_internal_error_は内部情報を含まない固定文言を返す() {
      assert_eq!(ErrorMessage::internal_error().message, "Internal server error");
   }

   #[test]
   fn test_jsonデシリアライズが正しく動作する() {
      let json = r#"{"message": "Invalid email type"}"#;
      let error: ErrorMessage = serde_json::from_str(json).unwrap();

      assert_eq!(error.message, "Invalid email type");
   }
}
