//! # SessionRepository
//!
//! 認証基盤が発行したセッショントークンから、セッションと
//! 紐づくユーザーを復元するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 回の JOIN で取得**: セッションとユーザーを別々に引かず、
//!   リクエストごとの DB ラウンドトリップを 1 回に抑える
//! - **有効期限の判定は呼び出し元**: リポジトリは `expires_at` を
//!   そのまま返し、失効判定は Clock を持つミドルウェアが行う

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kidlink_domain::{
   organization::OrganizationId,
   session::{Session, SessionId},
   user::{Email, User, UserId, UserName, UserRole},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// セッションリポジトリトレイト
///
/// セッショントークンの照合結果を提供する。
/// 認証ミドルウェアから利用される。
#[async_trait]
pub trait SessionRepository: Send + Sync {
   /// セッショントークンでセッションとユーザーを検索する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some((session, user)))`: トークンに対応するセッションが存在する場合
   /// - `Ok(None)`: トークンが未知の場合
   /// - `Err(_)`: データベースエラー
   async fn find_by_token(&self, token: &str) -> Result<Option<(Session, User)>, InfraError>;
}

/// PostgreSQL 実装の SessionRepository
#[derive(Debug, Clone)]
pub struct PostgresSessionRepository {
   pool: PgPool,
}

impl PostgresSessionRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

/// sessions と users の JOIN 結果
#[derive(sqlx::FromRow)]
struct SessionUserRow {
   session_id: Uuid,
   user_id: Uuid,
   active_organization_id: Option<Uuid>,
   expires_at: DateTime<Utc>,
   email: String,
   name: String,
   role: String,
   email_verified: bool,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
   async fn find_by_token(&self, token: &str) -> Result<Option<(Session, User)>, InfraError> {
      let row = sqlx::query_as::<_, SessionUserRow>(
         r#"
            SELECT
                s.id AS session_id,
                s.user_id,
                s.active_organization_id,
                s.expires_at,
                u.email,
                u.name,
                u.role,
                u.email_verified,
                u.created_at,
                u.updated_at
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
            "#,
      )
      .bind(token)
      .fetch_optional(&self.pool)
      .await?;

      let Some(row) = row else {
         return Ok(None);
      };

      let session = Session::from_db(
         SessionId::from_uuid(row.session_id),
         UserId::from_uuid(row.user_id),
         row.active_organization_id.map(OrganizationId::from_uuid),
         row.expires_at,
      );

      let user = User::from_db(
         UserId::from_uuid(row.user_id),
         Email::new(&row.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
         UserName::new(&row.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
         UserRole::from_db_value(&row.role),
         row.email_verified,
         row.created_at,
         row.updated_at,
      );

      Ok(Some((session, user)))
   }
}
