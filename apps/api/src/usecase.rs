//! # ユースケース
//!
//! API のビジネスロジックを実装する。
//!
//! - [`user_type`]: ユーザー区分の解決
//! - [`notification`]: メール通知の送出

pub mod notification;
pub mod user_type;

pub use notification::{EmailService, TemplateRenderer};
pub use user_type::{UserTypeError, UserTypeResolver};
