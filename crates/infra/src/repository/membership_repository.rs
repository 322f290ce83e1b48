//! # MembershipRepository
//!
//! ユーザーの組織所属レコードを参照するリポジトリ。
//!
//! ## 設計方針
//!
//! - **存在確認が主目的**: ユーザー区分の解決では「所属が 1 件以上あるか」
//!   のみを参照するため、最初の 1 件だけを取得する
//! - **読み取り専用**: このリポジトリは書き込みを提供しない
//!   （組織・メンバーの作成は認証基盤の organization プラグインの責務）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kidlink_domain::{
   organization::{MemberRole, Membership, MembershipId, OrganizationId},
   user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// メンバーシップリポジトリトレイト
///
/// ユーザーの組織所属の参照操作を定義する。
/// ユーザー区分の解決（UserTypeResolver）から利用される。
#[async_trait]
pub trait MembershipRepository: Send + Sync {
   /// ユーザーの最初のメンバーシップレコードを検索する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(membership))`: ユーザーが少なくとも 1 つの組織に所属する場合
   /// - `Ok(None)`: 所属が存在しない場合
   /// - `Err(_)`: データベースエラー
   async fn find_first_by_user(&self, user_id: &UserId)
   -> Result<Option<Membership>, InfraError>;
}

/// PostgreSQL 実装の MembershipRepository
#[derive(Debug, Clone)]
pub struct PostgresMembershipRepository {
   pool: PgPool,
}

impl PostgresMembershipRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
   id: Uuid,
   user_id: Uuid,
   organization_id: Uuid,
   role: String,
   created_at: DateTime<Utc>,
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
   async fn find_first_by_user(
      &self,
      user_id: &UserId,
   ) -> Result<Option<Membership>, InfraError> {
      let row = sqlx::query_as::<_, MembershipRow>(
         r#"
            SELECT
                id,
                user_id,
                organization_id,
                role,
                created_at
            FROM members
            WHERE user_id = $1
            ORDER BY created_at
            LIMIT 1
            "#,
      )
      .bind(user_id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      let Some(row) = row else {
         return Ok(None);
      };

      Ok(Some(Membership::from_db(
         MembershipId::from_uuid(row.id),
         UserId::from_uuid(row.user_id),
         OrganizationId::from_uuid(row.organization_id),
         MemberRole::from_db_value(&row.role),
         row.created_at,
      )))
   }
}
