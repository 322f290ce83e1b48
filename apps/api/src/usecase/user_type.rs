//! # ユーザー区分の解決
//!
//! 認証済みセッションから、クライアント側ルーティングに使う粗い
//! 区分（`user` / `hotelOwner` / `systemAdmin`）を導出する。
//!
//! ## 判定順序（上から順に評価し、最初に一致したものを採用）
//!
//! 1. ユーザーのロールが `admin` → `systemAdmin`
//! 2. セッションにアクティブな組織がある → `hotelOwner`
//! 3. メンバーシップレコードが 1 件以上ある → `hotelOwner`
//! 4. それ以外 → `user`（デフォルト／フォールバック）
//!
//! この順序は仕様であり、並べ替えてはならない。
//!
//! ## 失敗ポリシー
//!
//! メンバーシップ照会のエラーは `user` に縮退する（fail-open）。
//! 区分は UI のルーティングヒントであり、認証済みの呼び出しを
//! 照会失敗で 5xx にしない。縮退は明示的な分岐として実装し、
//! テストで検証する。

use std::sync::Arc;

use kidlink_domain::{session::Session, user::User, user_type::UserType};
use kidlink_infra::repository::MembershipRepository;
use thiserror::Error;

/// ユーザー区分の解決エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserTypeError {
    /// セッションまたはユーザーがコンテキストに存在しない
    #[error("認証されていません")]
    Unauthorized,
}

/// ユーザー区分リゾルバ
///
/// 区分は（セッション、ユーザー、メンバーシップ照会結果）の
/// リクエスト時点での純粋関数であり、キャッシュも保存もしない。
/// 副作用はメンバーシップストアへの読み取り 1 回のみ。
pub struct UserTypeResolver {
    membership_repository: Arc<dyn MembershipRepository>,
}

impl UserTypeResolver {
    pub fn new(membership_repository: Arc<dyn MembershipRepository>) -> Self {
        Self {
            membership_repository,
        }
    }

    /// ユーザー区分を解決する
    ///
    /// # 引数
    ///
    /// - `session` / `user`: 認証ミドルウェアが復元したコンテキスト。
    ///   どちらかが欠けていれば未認証
    ///
    /// # 戻り値
    ///
    /// - `Ok(user_type)`: 解決された区分
    /// - `Err(UserTypeError::Unauthorized)`: 未認証の場合。
    ///   このときメンバーシップ照会は行われない
    pub async fn resolve(
        &self,
        session: Option<&Session>,
        user: Option<&User>,
    ) -> Result<UserType, UserTypeError> {
        let (Some(session), Some(user)) = (session, user) else {
            return Err(UserTypeError::Unauthorized);
        };

        if user.is_admin() {
            return Ok(UserType::SystemAdmin);
        }

        if session.active_organization_id().is_some() {
            return Ok(UserType::HotelOwner);
        }

        // アクティブな組織がなくても、所属が 1 件以上あれば組織運営者
        match self.membership_repository.find_first_by_user(user.id()).await {
            Ok(Some(_)) => Ok(UserType::HotelOwner),
            Ok(None) => Ok(UserType::User),
            Err(e) => {
                // fail-open: 照会失敗は user に縮退し、エラーは伝播させない
                tracing::warn!(
                    error = %e,
                    user_id = %user.id(),
                    "メンバーシップ照会に失敗。区分を user に縮退する"
                );
                Ok(UserType::User)
            }
        }
    }
}
