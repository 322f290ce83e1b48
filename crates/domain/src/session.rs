//! # 認証セッション
//!
//! 外部の認証基盤が発行するセッションのうち、このサービスが参照する
//! 属性のみをモデル化する。
//!
//! ## 設計方針
//!
//! - セッショントークンの暗号学的な構築・検証は認証基盤の責務であり、
//!   このモデルはトークン照合後の結果だけを受け取る
//! - `active_organization_id` はユーザーが現在操作中の組織を示し、
//!   ユーザー区分の解決に使用される

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{organization::OrganizationId, user::UserId};

define_uuid_id! {
   /// セッション ID（一意識別子）
   ///
   /// sessions テーブルの主キー。UUID v7 を使用。
   pub struct SessionId;
}

/// 認証セッション
///
/// リクエストをユーザーと、任意でアクティブな組織に結びつける
/// 短命なコンテキスト。リクエストごとに認証ミドルウェアが復元する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
   id: SessionId,
   user_id: UserId,
   active_organization_id: Option<OrganizationId>,
   expires_at: DateTime<Utc>,
}

impl Session {
   /// データベースからセッションを復元する
   pub fn from_db(
      id: SessionId,
      user_id: UserId,
      active_organization_id: Option<OrganizationId>,
      expires_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         user_id,
         active_organization_id,
         expires_at,
      }
   }

   pub fn id(&self) -> &SessionId {
      &self.id
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   /// アクティブな組織 ID を取得する
   ///
   /// 設定されていればユーザーは組織を操作中であり、
   /// ユーザー区分の解決で `hotelOwner` に分類される。
   pub fn active_organization_id(&self) -> Option<&OrganizationId> {
      self.active_organization_id.as_ref()
   }

   pub fn expires_at(&self) -> DateTime<Utc> {
      self.expires_at
   }

   /// セッションが失効しているか判定する
   ///
   /// # 引数
   ///
   /// - `now`: 現在時刻（呼び出し元から注入）
   pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
      self.expires_at <= now
   }
}
