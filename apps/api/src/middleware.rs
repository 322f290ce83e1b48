//! # ミドルウェア
//!
//! リクエスト処理の前段で動作する共通処理を提供する。
//!
//! - [`session`]: セッション Cookie からの認証コンテキスト復元

pub mod session;

pub use session::{AuthContext, SESSION_COOKIE_NAME, SessionState, load_session};
