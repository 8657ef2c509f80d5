use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::export::EmailMessage;

/// Client for an HTTP email API (Resend-compatible payload).
#[derive(Debug, Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    /// Send one message. Non-2xx responses are returned as errors so callers
    /// can decide whether to record the send.
    pub async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let body = payload(&self.from, message);

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, to = %message.to, "Email API returned non-2xx");
            anyhow::bail!("email API returned {status}: {text}");
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

fn payload(from: &str, message: &EmailMessage) -> serde_json::Value {
    let attachments: Vec<serde_json::Value> = message
        .attachment
        .iter()
        .map(|a| {
            json!({
                "filename": a.filename,
                "content": STANDARD.encode(&a.content),
                "content_type": a.content_type,
            })
        })
        .collect();

    json!({
        "from": from,
        "to": [message.to],
        "subject": message.subject,
        "html": message.html,
        "attachments": attachments,
    })
}
