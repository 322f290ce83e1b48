//! # メール通知
//!
//! テンプレートレンダリングとトランスポート呼び出しを統合する。

mod service;
mod template_renderer;

pub use service::EmailService;
pub use template_renderer::TemplateRenderer;
