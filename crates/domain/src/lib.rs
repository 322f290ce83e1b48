//! # Kidlink ドメイン層
//!
//! ビジネスロジックの中核を担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: User, Membership）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email,
//!   UserType）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//! これにより、ビジネスロジックの純粋性が保たれる。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ユーザーエンティティと関連値オブジェクト
//! - [`organization`] - 組織・メンバーシップ
//! - [`session`] - 認証セッション
//! - [`user_type`] - ユーザー区分（クライアント側ルーティング用）
//! - [`notification`] - メール通知のドメインモデル
//! - [`clock`] - 時刻プロバイダ抽象

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod organization;
pub mod session;
pub mod user;
pub mod user_type;

pub use error::DomainError;
