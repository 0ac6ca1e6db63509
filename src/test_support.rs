use axum::{
  body::{Body, Bytes},
  http::{Request, Response, StatusCode},
  Router,
};
use serde::Serialize;
use sqlx::MySqlPool;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
  app::create_app,
  email::{EmailService, SmtpConfig},
  matcher::{FaceMatch, FaceMatcher, MatcherError},
  state::SharedAppState,
  storage::ImageStore,
  utils::google::{GoogleProfile, GoogleTokenVerifier},
  utils::jwt::{encode_jwt, Claims},
};

pub const STUB_GOOGLE_TOKEN: &str = "stub-google-token";

/// Matcher that returns a canned result instead of calling the sidecar.
pub struct StubMatcher {
  pub matches: Vec<FaceMatch>,
}

#[async_trait::async_trait]
impl FaceMatcher for StubMatcher {
  async fn find(&self, _query: &Path, _gallery: &Path) -> Result<Vec<FaceMatch>, MatcherError> {
    Ok(self.matches.clone())
  }
}

struct StubGoogleVerifier;

#[async_trait::async_trait]
impl GoogleTokenVerifier for StubGoogleVerifier {
  async fn verify(&self, id_token: &str) -> anyhow::Result<GoogleProfile> {
    if id_token == STUB_GOOGLE_TOKEN {
      Ok(GoogleProfile {
        email: "googler@example.com".to_string(),
        name: Some("Googler".to_string()),
        google_id: "google-oauth2|stub".to_string(),
      })
    } else {
      anyhow::bail!("invalid token")
    }
  }
}

pub fn stub_google_verifier() -> Arc<dyn GoogleTokenVerifier> {
  Arc::new(StubGoogleVerifier)
}

pub fn test_email_service() -> EmailService {
  let smtp_config = SmtpConfig {
    host: "localhost".to_string(),
    port: 1025,
    username: "test".to_string(),
    password: "test".to_string(),
    from_email: "noreply@test.com".to_string(),
  };
  EmailService::new(smtp_config).expect("Failed to create test email service")
}

fn test_store() -> ImageStore {
  let root = std::env::temp_dir().join(format!("findme-test-{}", Uuid::new_v4().simple()));
  ImageStore::new(root.join("images"), root.join("temp")).expect("Failed to create test image store")
}

pub async fn state_with_pool(pool: MySqlPool) -> SharedAppState {
  state_with_matcher(pool, Arc::new(StubMatcher { matches: vec![] })).await
}

pub async fn state_with_matcher(pool: MySqlPool, matcher: Arc<dyn FaceMatcher>) -> SharedAppState {
  std::env::set_var("JWT_SECRET", "test-secret");
  SharedAppState::new(pool, test_email_service(), test_store(), matcher, stub_google_verifier()).await
}

pub async fn app_with_pool(pool: MySqlPool) -> Router {
  create_app(state_with_pool(pool).await)
}

pub async fn app_with_matcher(pool: MySqlPool, matcher: Arc<dyn FaceMatcher>) -> Router {
  create_app(state_with_matcher(pool, matcher).await)
}

pub fn auth_token(user_id: i32, email: &str) -> String {
  std::env::set_var("JWT_SECRET", "test-secret");
  let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
  encode_jwt(Claims {
    sub: email.to_string(),
    exp,
    user_id,
  })
  .expect("encode test token")
}

pub fn tiny_png_bytes() -> Vec<u8> {
  let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 150, 100]));
  let mut bytes = Vec::new();
  image::DynamicImage::ImageRgb8(img)
    .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
    .expect("encode png");
  bytes
}

pub fn tiny_png_b64() -> String {
  use base64::{engine::general_purpose::STANDARD, Engine as _};
  STANDARD.encode(tiny_png_bytes())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .expect("build request");
  send(app, request).await
}

pub async fn get_raw(app: Router, uri: &str) -> Response<Body> {
  let request = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .expect("build request");
  app.oneshot(request).await.expect("handle request")
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(body).expect("serialize request body")))
    .expect("build request");
  send(app, request).await
}

pub async fn post_json_auth<T: Serialize>(app: Router, uri: &str, token: &str, body: &T) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("authorization", format!("Bearer {}", token))
    .header("content-type", "application/json")
    .body(Body::from(serde_json::to_vec(body).expect("serialize request body")))
    .expect("build request");
  send(app, request).await
}

pub async fn delete_with_auth(app: Router, uri: &str, token: &str) -> (StatusCode, Bytes) {
  let request = Request::builder()
    .method("DELETE")
    .uri(uri)
    .header("authorization", format!("Bearer {}", token))
    .body(Body::empty())
    .expect("build request");
  send(app, request).await
}

pub async fn post_multipart(
  app: Router,
  uri: &str,
  token: Option<&str>,
  fields: &[(&str, &str)],
  photo: Option<(&str, &[u8])>,
) -> (StatusCode, Bytes) {
  const BOUNDARY: &str = "findme-test-boundary";

  let mut body: Vec<u8> = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
        BOUNDARY, name, value
      )
      .as_bytes(),
    );
  }
  if let Some((filename, data)) = photo {
    body.extend_from_slice(
      format!(
        "--{}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
        BOUNDARY, filename
      )
      .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

  let mut builder = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY));
  if let Some(token) = token {
    builder = builder.header("authorization", format!("Bearer {}", token));
  }

  let request = builder.body(Body::from(body)).expect("build request");
  send(app, request).await
}
