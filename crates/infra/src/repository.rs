//! # リポジトリ実装
//!
//! セッションとメンバーシップの参照を担当するリポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: トレイトを定義し、Postgres 実装をインフラ層で提供
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod membership_repository;
pub mod session_repository;

pub use membership_repository::{MembershipRepository, PostgresMembershipRepository};
pub use session_repository::{PostgresSessionRepository, SessionRepository};
