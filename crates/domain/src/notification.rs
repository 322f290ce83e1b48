//! # 通知
//!
//! トランザクショナルメール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`AccountNotification`] | アカウント通知イベント | 3 種類: パスワードリセット、メール検証、ウェルカム |
//! | [`EmailMessage`] | メールメッセージ | テンプレートレンダリングの出力。送信ごとに構築し、送信後に破棄 |
//! | [`EmailKind`] | 通知種別 | テストメール API の `type` パラメータに対応 |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 各バリアントが通知の種類とパラメータを持つ
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は api）
//! - **本文の二者択一**: レンダリング済み HTML/text か、プロバイダ側
//!   テンプレート ID + パラメータのどちらかを [`EmailBody`] で表現する

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知種別
///
/// テストメール API の `type` パラメータに対応する値。
/// ワイヤ表現は `welcome` / `reset` / `verification`。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
pub enum EmailKind {
    /// ウェルカムメール: アカウント作成後に送信
    #[serde(rename = "welcome")]
    #[strum(serialize = "welcome")]
    Welcome,
    /// パスワードリセット: リセット要求時に送信
    #[serde(rename = "reset")]
    #[strum(serialize = "reset")]
    PasswordReset,
    /// メールアドレス検証: アカウント作成時に送信
    #[serde(rename = "verification")]
    #[strum(serialize = "verification")]
    EmailVerification,
}

/// 送信元（名前 + メールアドレス）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSender {
    /// 表示名（例: "Kidlink"）
    pub name:    String,
    /// 送信元メールアドレス
    pub address: String,
}

/// メール本文
///
/// レンダリング済みの HTML/text か、プロバイダ側に登録された
/// テンプレート ID + パラメータのどちらか一方を持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    /// レンダリング済み本文（HTML + プレーンテキスト）
    Content {
        /// HTML 本文
        html: String,
        /// プレーンテキスト本文
        text: String,
    },
    /// プロバイダ側テンプレート
    Template {
        /// プロバイダに登録されたテンプレート ID
        template_id: i64,
        /// テンプレートに渡すパラメータ
        params:      serde_json::Map<String, serde_json::Value>,
    },
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
/// 送信呼び出しごとに構築され、トランスポート呼び出し後に破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:      String,
    /// 件名
    pub subject: String,
    /// 本文（レンダリング済み or テンプレート参照）
    pub body:    EmailBody,
    /// 送信元の上書き（None ならトランスポートのデフォルト送信元）
    pub sender:  Option<EmailSender>,
    /// プロバイダに渡すタグ（サンドボックス送信は `"sandbox"` が付く）
    pub tags:    Vec<String>,
}

impl EmailMessage {
    /// レンダリング済み本文のメッセージを作成する
    pub fn content(
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to:      to.into(),
            subject: subject.into(),
            body:    EmailBody::Content {
                html: html.into(),
                text: text.into(),
            },
            sender:  None,
            tags:    Vec::new(),
        }
    }

    /// プロバイダ側テンプレートを参照するメッセージを作成する
    pub fn template(
        to: impl Into<String>,
        subject: impl Into<String>,
        template_id: i64,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            to:      to.into(),
            subject: subject.into(),
            body:    EmailBody::Template {
                template_id,
                params,
            },
            sender:  None,
            tags:    Vec::new(),
        }
    }

    /// 送信元を上書きした新しいメッセージを返す
    pub fn with_sender(self, sender: EmailSender) -> Self {
        Self {
            sender: Some(sender),
            ..self
        }
    }
}

/// アカウント通知イベント
///
/// 各バリアントが通知の種類とレンダリングに必要なパラメータを持つ。
#[derive(Debug, Clone)]
pub enum AccountNotification {
    /// パスワードリセット: リセット用リンクと生トークンを送る
    PasswordReset {
        recipient_email: String,
        reset_url:       String,
        token:           String,
    },
    /// メールアドレス検証: 検証用リンクと生トークンを送る
    EmailVerification {
        recipient_email:  String,
        verification_url: String,
        token:            String,
    },
    /// ウェルカム: アプリケーションへの導線を送る
    Welcome {
        recipient_email: String,
        user_name:       String,
    },
}

impl AccountNotification {
    /// 通知種別を返す
    pub fn kind(&self) -> EmailKind {
        match self {
            Self::PasswordReset { .. } => EmailKind::PasswordReset,
            Self::EmailVerification { .. } => EmailKind::EmailVerification,
            Self::Welcome { .. } => EmailKind::Welcome,
        }
    }

    /// 受信者のメールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::PasswordReset {
                recipient_email, ..
            }
            | Self::EmailVerification {
                recipient_email, ..
            }
            | Self::Welcome {
                recipient_email, ..
            } => recipient_email,
        }
    }
}
