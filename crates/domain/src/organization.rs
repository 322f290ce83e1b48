//! # 組織・メンバーシップ
//!
//! マルチテナント SaaS における組織（ホテル運営者のテナント）と、
//! ユーザーの所属関係（メンバーシップ）のモデル。
//!
//! ## マルチテナントとは
//!
//! 単一のアプリケーションインスタンスで複数の顧客（組織）にサービスを
//! 提供するアーキテクチャ。各組織のデータは論理的に分離される。
//!
//! ## 設計判断
//!
//! メンバーシップレコードの「存在」自体がドメイン上の意味を持つ:
//! ユーザーがひとつでも組織に所属していれば、そのユーザーは
//! 組織運営者（ホテルオーナー）として分類される。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::user::UserId;

define_uuid_id! {
   /// 組織（テナント）の一意識別子
   ///
   /// すべての組織スコープのエンティティはこの ID を持ち、
   /// 組織間のデータ分離を保証する。
   pub struct OrganizationId;
}

define_uuid_id! {
   /// メンバーシップ ID（一意識別子）
   ///
   /// members テーブルの主キー。UUID v7 を使用。
   pub struct MembershipId;
}

/// 組織内でのメンバーロール
///
/// members テーブルの `role` カラムに対応する。
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
   /// 組織の作成者
   Owner,
   /// 組織の管理者
   Admin,
   /// 一般メンバー
   Member,
}

impl MemberRole {
   /// データベースの文字列値からロールを復元する
   ///
   /// 未知の値は最小権限の `Member` に縮退する。
   pub fn from_db_value(value: &str) -> Self {
      match value {
         "owner" => Self::Owner,
         "admin" => Self::Admin,
         _ => Self::Member,
      }
   }
}

/// メンバーシップ（ユーザーと組織の所属関係）
///
/// ユーザーが組織に所属していることを表すレコード。
/// ユーザー区分の解決では「レコードが 1 件以上存在するか」のみを参照する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
   id: MembershipId,
   user_id: UserId,
   organization_id: OrganizationId,
   role: MemberRole,
   created_at: DateTime<Utc>,
}

impl Membership {
   /// データベースからメンバーシップを復元する
   pub fn from_db(
      id: MembershipId,
      user_id: UserId,
      organization_id: OrganizationId,
      role: MemberRole,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         user_id,
         organization_id,
         role,
         created_at,
      }
   }

   pub fn id(&self) -> &MembershipId {
      &self.id
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn organization_id(&self) -> &OrganizationId {
      &self.organization_id
   }

   pub fn role(&self) -> MemberRole {
      self.role
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}
