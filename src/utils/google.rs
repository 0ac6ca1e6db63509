use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Profile claims extracted from a verified Google ID token.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
  pub email: String,
  pub name: Option<String>,
  pub google_id: String,
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
  async fn verify(&self, id_token: &str) -> Result<GoogleProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
  aud: String,
  email: String,
  name: Option<String>,
  sub: String,
}

/// Verifies Google ID tokens against the tokeninfo endpoint.
pub struct GoogleAuthClient {
  http: reqwest::Client,
  client_id: String,
}

impl GoogleAuthClient {
  pub fn new(client_id: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      client_id,
    }
  }

  pub fn from_env() -> Result<Self> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID not set")?;
    Ok(Self::new(client_id))
  }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleAuthClient {
  async fn verify(&self, id_token: &str) -> Result<GoogleProfile> {
    let response = self
      .http
      .get(TOKENINFO_URL)
      .query(&[("id_token", id_token)])
      .send()
      .await
      .context("tokeninfo request failed")?;

    if !response.status().is_success() {
      bail!("Google rejected the ID token ({})", response.status());
    }

    let info: TokenInfo = response.json().await.context("tokeninfo response was not valid JSON")?;

    if info.aud != self.client_id {
      bail!("ID token was issued for another client");
    }

    Ok(GoogleProfile {
      email: info.email,
      name: info.name,
      google_id: info.sub,
    })
  }
}
