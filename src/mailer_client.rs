// Transactional email client (Resend-style HTTP API)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Mail API request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Mail API error ({status}): {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct MailerClient {
    api_key: String,
    client: Client,
    base_url: String,
    from: String,
}

#[derive(Serialize, Debug)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    text: String,
}

#[derive(Deserialize, Debug)]
struct SendEmailResponse {
    id: String,
}

impl MailerClient {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            base_url: "https://api.resend.com".to_string(),
            from,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends a plain-text email and returns the provider's message id.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
    ) -> Result<String, MailerError> {
        let request_body = SendEmailRequest {
            from: self.from.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Mail API error ({}): {}", status, body);
            return Err(MailerError::Status { status, body });
        }

        let sent = response.json::<SendEmailResponse>().await?;
        info!("📧 Email sent to {} (id: {})", to, sent.id);
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn send_posts_message_with_configured_sender() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer mail-key"))
            .and(body_json(json!({
                "from": "Dukaan Hotels <bookings@dukaan.example>",
                "to": ["guest@example.com"],
                "subject": "Hotel Booking Details at dukaan",
                "text": "see you soon"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = MailerClient::new(
            "mail-key".to_string(),
            "Dukaan Hotels <bookings@dukaan.example>".to_string(),
        )
        .with_base_url(server.uri());

        let id = mailer
            .send("guest@example.com", "Hotel Booking Details at dukaan", "see you soon")
            .await
            .unwrap();

        assert_eq!(id, "email_1");
    }

    #[tokio::test]
    async fn send_surfaces_provider_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid recipient"))
            .mount(&server)
            .await;

        let mailer = MailerClient::new("mail-key".to_string(), "noreply@dukaan.example".to_string())
            .with_base_url(server.uri());

        let err = mailer.send("not-an-address", "subject", "body").await.unwrap_err();
        match err {
            MailerError::Status { status, body } => {
                assert_eq!(status.as_u16(), 422);
                assert_eq!(body, "invalid recipient");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }
}
