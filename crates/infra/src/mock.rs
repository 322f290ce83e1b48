//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! kidlink-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
   Arc,
   Mutex,
   atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use kidlink_domain::{
   notification::{EmailMessage, NotificationError},
   organization::Membership,
   session::Session,
   user::{User, UserId},
};

use crate::{
   error::InfraError,
   notification::NotificationSender,
   repository::{MembershipRepository, SessionRepository},
};

// ===== MockSessionRepository =====

/// テスト用セッションリポジトリ
///
/// `insert` で登録した（トークン → セッション + ユーザー）の組を返す。
#[derive(Clone, Default)]
pub struct MockSessionRepository {
   sessions: Arc<Mutex<Vec<(String, Session, User)>>>,
}

impl MockSessionRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// トークンに対応するセッションとユーザーを登録する
   pub fn insert(&self, token: impl Into<String>, session: Session, user: User) {
      self
         .sessions
         .lock()
         .unwrap()
         .push((token.into(), session, user));
   }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
   async fn find_by_token(&self, token: &str) -> Result<Option<(Session, User)>, InfraError> {
      Ok(self
         .sessions
         .lock()
         .unwrap()
         .iter()
         .find(|(t, _, _)| t == token)
         .map(|(_, session, user)| (session.clone(), user.clone())))
   }
}

// ===== MockMembershipRepository =====

/// テスト用メンバーシップリポジトリ
///
/// 登録済みメンバーシップの検索に加え、照会回数の記録と
/// 強制的なエラー返却（fail-open 分岐のテスト用）を提供する。
#[derive(Clone, Default)]
pub struct MockMembershipRepository {
   memberships: Arc<Mutex<Vec<Membership>>>,
   fail:        Arc<Mutex<bool>>,
   lookups:     Arc<AtomicUsize>,
}

impl MockMembershipRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// メンバーシップレコードを登録する
   pub fn add_membership(&self, membership: Membership) {
      self.memberships.lock().unwrap().push(membership);
   }

   /// 以後の照会をすべてエラーにする
   pub fn set_fail(&self, fail: bool) {
      *self.fail.lock().unwrap() = fail;
   }

   /// これまでの照会回数を返す
   pub fn lookup_count(&self) -> usize {
      self.lookups.load(Ordering::SeqCst)
   }
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
   async fn find_first_by_user(
      &self,
      user_id: &UserId,
   ) -> Result<Option<Membership>, InfraError> {
      self.lookups.fetch_add(1, Ordering::SeqCst);

      if *self.fail.lock().unwrap() {
         return Err(InfraError::unexpected("モックが失敗するよう設定されている"));
      }

      Ok(self
         .memberships
         .lock()
         .unwrap()
         .iter()
         .find(|m| m.user_id() == user_id)
         .cloned())
   }
}

// ===== MockNotificationSender =====

/// テスト用通知送信
///
/// 送信されたメッセージを記録する。`set_fail` で送信失敗を再現できる。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
   sent: Arc<Mutex<Vec<EmailMessage>>>,
   fail: Arc<Mutex<bool>>,
}

impl MockNotificationSender {
   pub fn new() -> Self {
      Self::default()
   }

   /// 以後の送信をすべてエラーにする
   pub fn set_fail(&self, fail: bool) {
      *self.fail.lock().unwrap() = fail;
   }

   /// これまでに送信されたメッセージを返す
   pub fn sent_emails(&self) -> Vec<EmailMessage> {
      self.sent.lock().unwrap().clone()
   }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
   async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
      if *self.fail.lock().unwrap() {
         return Err(NotificationError::SendFailed(
            "モックが失敗するよう設定されている".to_string(),
         ));
      }

      self.sent.lock().unwrap().push(email.clone());
      Ok(format!("mock-{}", self.sent.lock().unwrap().len()))
   }
}
