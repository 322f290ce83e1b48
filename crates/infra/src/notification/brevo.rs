//! Brevo 通知送信実装
//!
//! Brevo のトランザクショナルメール API（`POST /v3/smtp/email`）を
//! 使用してメールを送信する。本番環境で使用する。

use async_trait::async_trait;
use kidlink_domain::notification::{EmailBody, EmailMessage, EmailSender, NotificationError};
use serde::{Deserialize, Serialize};

use super::NotificationSender;

/// Brevo API のベース URL
const DEFAULT_API_BASE_URL: &str = "https://api.brevo.com";

/// API 呼び出しのタイムアウト（秒）
///
/// HTTP クライアントのデフォルト（無制限）に依存せず、
/// リクエストハンドラが外部 API 起因で詰まらないよう明示する。
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Brevo 通知送信
///
/// `reqwest::Client` をラップし、Brevo のトランザクショナルメール API を
/// 呼び出す。クライアントはプロセス起動時に 1 度だけ構築して共有する。
pub struct BrevoNotificationSender {
    http:           reqwest::Client,
    api_key:        String,
    api_base_url:   String,
    default_sender: EmailSender,
}

impl BrevoNotificationSender {
    /// 新しい Brevo 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `api_key`: Brevo の API キー
    /// - `default_sender`: メッセージに送信元指定がない場合に使う送信元
    pub fn new(api_key: String, default_sender: EmailSender) -> Self {
        Self::with_base_url(api_key, default_sender, DEFAULT_API_BASE_URL.to_string())
    }

    /// ベース URL を指定して作成（テスト・プロキシ環境用）
    pub fn with_base_url(
        api_key: String,
        default_sender: EmailSender,
        api_base_url: String,
    ) -> Self {
        // TLS バックエンドの初期化失敗時のみ失敗する（起動時に 1 度だけ呼ばれる）
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("HTTP クライアントの構築に失敗しました");

        Self {
            http,
            api_key,
            api_base_url,
            default_sender,
        }
    }

    /// ドメインの `EmailMessage` から Brevo のリクエストペイロードを構築する
    fn build_payload<'a>(&'a self, email: &'a EmailMessage) -> SendEmailRequest<'a> {
        let sender = email.sender.as_ref().unwrap_or(&self.default_sender);

        let mut request = SendEmailRequest {
            sender:       SenderPayload {
                name:  &sender.name,
                email: &sender.address,
            },
            to:           vec![RecipientPayload { email: &email.to }],
            subject:      &email.subject,
            html_content: None,
            text_content: None,
            template_id:  None,
            params:       None,
            tags:         &email.tags,
        };

        match &email.body {
            EmailBody::Content { html, text } => {
                request.html_content = Some(html);
                request.text_content = Some(text);
            }
            EmailBody::Template {
                template_id,
                params,
            } => {
                request.template_id = Some(*template_id);
                request.params = Some(params);
            }
        }

        request
    }
}

/// `POST /v3/smtp/email` のリクエストボディ
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender:       SenderPayload<'a>,
    to:           Vec<RecipientPayload<'a>>,
    subject:      &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id:  Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params:       Option<&'a serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    tags:         &'a [String],
}

#[derive(Debug, Serialize)]
struct SenderPayload<'a> {
    name:  &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct RecipientPayload<'a> {
    email: &'a str,
}

/// `POST /v3/smtp/email` のレスポンスボディ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: String,
}

#[async_trait]
impl NotificationSender for BrevoNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
        let url = format!("{}/v3/smtp/email", self.api_base_url);
        let payload = self.build_payload(email);

        let response = self
            .http
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Brevo API 呼び出し失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::SendFailed(format!(
                "Brevo API がエラーを返した: status={status} body={body}"
            )));
        }

        let body: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Brevo レスポンス解析失敗: {e}")))?;

        Ok(body.message_id)
    }
}
