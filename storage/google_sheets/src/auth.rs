use anyhow::Context;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use shared_kernel::http_client::HttpClient;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use url::Url;

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
// Re-mint this long before the current token expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The subset of a Google service-account key file that token minting needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: Secret<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key file {path}"))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to deserialize service account key file {path}"))
    }
}

#[derive(Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Mints spreadsheet-scoped bearer tokens from a service-account key and
/// caches them until shortly before expiry.
pub struct ServiceAccountTokens {
    key: ServiceAccountKey,
    token_url: Url,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokens {
    pub fn new(key: ServiceAccountKey, token_url: Url) -> Self {
        Self {
            key,
            token_url,
            cached: Mutex::new(None),
        }
    }

    #[tracing::instrument(err, skip(self), level = "debug")]
    pub async fn bearer_token(&self) -> anyhow::Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.token.clone());
            }
        }

        let response = self.mint().await?;
        let expires_at = Instant::now()
            + Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        let token = response.access_token.clone();
        *cached = Some(CachedToken {
            token: response.access_token,
            expires_at,
        });
        Ok(token)
    }

    async fn mint(&self) -> anyhow::Result<TokenResponse> {
        let assertion = self.signed_assertion()?;
        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];
        HttpClient::post_form::<TokenResponse, _>(self.token_url.clone(), &form)
            .await
            .context("Failed to exchange the signed assertion for an access token")
    }

    fn signed_assertion(&self) -> anyhow::Result<String> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the unix epoch")?
            .as_secs();
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SPREADSHEETS_SCOPE.to_string(),
            aud: self.token_url.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME.as_secs(),
        };

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())
            .context("Service account private key is not a valid RSA PEM")?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .context("Failed to sign the access token assertion")
    }
}
