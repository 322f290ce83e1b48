//! # ユーザー区分
//!
//! クライアント側ルーティングのための粗い分類（Classification）。
//!
//! ## 設計方針
//!
//! - **派生値であり永続化しない**: 区分は（セッション、ユーザー、
//!   メンバーシップ照会結果）のリクエスト時点での純粋関数であり、
//!   キャッシュも保存もされない
//! - **ワイヤ表現の固定**: クライアントは `"user" | "hotelOwner" |
//!   "systemAdmin"` の文字列に依存しているため、serde 表現を camelCase
//!   に固定する

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// ユーザー区分
///
/// `GET /check-user-type` のレスポンスでクライアントに返され、
/// 画面遷移の振り分けに使用される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum UserType {
    /// 一般ユーザー（デフォルト／フォールバック）
    User,
    /// 組織（ホテル）運営者
    HotelOwner,
    /// システム管理者
    SystemAdmin,
}
