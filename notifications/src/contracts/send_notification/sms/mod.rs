use crate::config::Settings;
use anyhow::Context;
use entities::subscribers::PhoneNumber;
use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::http_client::{BasicAuth, HttpClient};
use url::Url;

/// Proof that the messaging provider accepted a message.
#[derive(Clone, Debug)]
pub struct DeliveryReceipt {
    pub sid: String,
    pub status: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
    status: String,
}

/// Sends composed alerts through the messaging provider's REST API.
pub struct SmsNotificationInteractor {
    host: Url,
    account_sid: String,
    auth_token: Secret<String>,
    sender_number: String,
}

impl SmsNotificationInteractor {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?.sms;
        let host = Url::parse(&settings.host)
            .with_context(|| format!("Invalid sms host {}", &settings.host))?;
        Ok(Self::with_host(
            host,
            settings.account_sid,
            settings.auth_token,
            settings.sender_number,
        ))
    }

    pub fn with_host(
        host: Url,
        account_sid: String,
        auth_token: Secret<String>,
        sender_number: String,
    ) -> Self {
        Self {
            host,
            account_sid,
            auth_token,
            sender_number,
        }
    }

    #[tracing::instrument(err, skip(self, body), level = "info")]
    pub async fn deliver(&self, to: &PhoneNumber, body: &str) -> anyhow::Result<DeliveryReceipt> {
        let url = self
            .host
            .join(&format!(
                "/2010-04-01/Accounts/{}/Messages.json",
                self.account_sid
            ))
            .context("Failed to build the messages url")?;

        let auth = BasicAuth {
            username: self.account_sid.clone(),
            password: self.auth_token.clone(),
        };
        let form = [
            ("To", to.inner()),
            ("From", self.sender_number.clone()),
            ("Body", body.to_string()),
        ];

        let response = HttpClient::post_form_with_basic_auth::<MessageResponse, _>(url, &auth, &form)
            .await
            .with_context(|| format!("Failed to send the notification to {to}"))?;

        tracing::debug!("Message {} accepted as {}", response.sid, response.status);
        Ok(DeliveryReceipt {
            sid: response.sid,
            status: response.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn messages_are_posted_as_form_data_with_basic_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header_exists("Authorization"))
            .and(body_string_contains("To=%2B13055550133"))
            .and(body_string_contains("From=%2B13055550100"))
            .and(body_string_contains("Body=The+Aventura+Eruv+is+Up"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "SM123",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let interactor = SmsNotificationInteractor::with_host(
            Url::parse(&server.uri()).unwrap(),
            "AC123".to_string(),
            Secret::new("twilio-token".to_string()),
            "+13055550100".to_string(),
        );
        let to = PhoneNumber::try_from("3055550133".to_string()).unwrap();

        let receipt = interactor
            .deliver(&to, "The Aventura Eruv is Up.")
            .await
            .unwrap();

        assert_eq!(receipt.sid, "SM123");
        assert_eq!(receipt.status, "queued");
    }
}
