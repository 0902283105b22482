use std::time::Duration;

use async_trait::async_trait;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use secrecy::ExposeSecret as _;
use serde::Deserialize;

use crate::{
    config::GmailCredentials,
    errors::{AppError, AppResult},
};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Sends one HTML email and returns the provider's message id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

pub struct GmailSender {
    http: reqwest::Client,
    credentials: GmailCredentials,
}

impl GmailSender {
    pub fn new(credentials: GmailCredentials, timeout_seconds: u64) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, credentials })
    }

    /// Exchanges the stored refresh token for a short-lived access token.
    async fn access_token(&self) -> AppResult<String> {
        let response = self
            .http
            .post(TOKEN_URL)
            .header("accept", "application/json")
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.expose_secret()),
                ("refresh_token", self.credentials.refresh_token.expose_secret()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to reach OAuth token endpoint: {}", e);
                AppError::MailDelivery(format!("Failed to refresh access token: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("OAuth token refresh failed with status {}", status);
            return Err(AppError::MailDelivery(format!(
                "Token refresh failed with status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::MailDelivery(format!("Invalid token response: {}", e))
        })?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl MailSender for GmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<String> {
        let access_token = self.access_token().await?;
        let raw = URL_SAFE_NO_PAD.encode(build_mime_message(
            &self.credentials.sender,
            to,
            subject,
            html_body,
        ));

        let response = self
            .http
            .post(SEND_URL)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .map_err(|e| AppError::MailDelivery(format!("Failed to send message: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gmail send failed with status {}", status);
            return Err(AppError::MailDelivery(format!(
                "Gmail returned status {}: {}",
                status, body
            )));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::MailDelivery(format!("Invalid send response: {}", e)))?;
        log::info!("Quiz results email sent");
        Ok(sent.id)
    }
}

fn header_value(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// RFC 2822 message with a base64 HTML body and an encoded-word subject.
pub fn build_mime_message(from: &str, to: &str, subject: &str, html_body: &str) -> String {
    format!(
        "From: {from}\r\nTo: {to}\r\nSubject: =?UTF-8?B?{subject}?=\r\nMIME-Version: 1.0\r\n\
         Content-Type: text/html; charset=\"UTF-8\"\r\nContent-Transfer-Encoding: base64\r\n\r\n{body}",
        from = header_value(from),
        to = header_value(to),
        subject = STANDARD.encode(header_value(subject)),
        body = STANDARD.encode(html_body),
    )
}
