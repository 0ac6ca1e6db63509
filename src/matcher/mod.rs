use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Cache files the face-recognition tooling drops into the gallery directory.
/// They must be removed whenever the gallery changes so the next scan
/// re-indexes every photo.
const INDEX_CACHE_FILES: &[&str] = &["representations_facenet512.pkl", "representations_vgg_face.pkl"];

const DEFAULT_MODEL: &str = "Facenet512";
const DEFAULT_DISTANCE_METRIC: &str = "cosine";

#[derive(Debug, Error)]
pub enum MatcherError {
  #[error("no face could be detected in the query image")]
  NoFaceDetected,

  #[error("face matcher unavailable: {0}")]
  Unavailable(String),

  #[error("face matcher failed: {0}")]
  Failed(String),
}

/// One row of a gallery scan: a gallery image and its distance to the query.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceMatch {
  pub identity: String,
  pub distance: f64,
}

#[async_trait]
pub trait FaceMatcher: Send + Sync {
  async fn find(&self, query: &Path, gallery: &Path) -> Result<Vec<FaceMatch>, MatcherError>;
}

#[derive(Debug, Serialize)]
struct FindRequest<'a> {
  img_path: &'a str,
  db_path: &'a str,
  model_name: &'a str,
  distance_metric: &'a str,
  enforce_detection: bool,
}

/// Client for the face-recognition sidecar.
///
/// The sidecar wraps the actual recognition library and exposes a single
/// `POST /find` accepting a query image path plus a gallery directory, and
/// returning `[{ identity, distance }]` rows sorted by distance.
pub struct FaceApiClient {
  http: reqwest::Client,
  base_url: String,
  model: String,
  distance_metric: String,
}

impl FaceApiClient {
  pub fn new(base_url: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
      model: std::env::var("FACE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
      distance_metric: DEFAULT_DISTANCE_METRIC.to_string(),
    }
  }

  pub fn from_env() -> anyhow::Result<Self> {
    let base_url = std::env::var("FACE_API_URL").map_err(|_| anyhow::anyhow!("FACE_API_URL not set"))?;
    Ok(Self::new(base_url))
  }
}

#[async_trait]
impl FaceMatcher for FaceApiClient {
  async fn find(&self, query: &Path, gallery: &Path) -> Result<Vec<FaceMatch>, MatcherError> {
    let request = FindRequest {
      img_path: &query.to_string_lossy(),
      db_path: &gallery.to_string_lossy(),
      model_name: &self.model,
      distance_metric: &self.distance_metric,
      enforce_detection: false,
    };

    let response = self
      .http
      .post(format!("{}/find", self.base_url))
      .json(&request)
      .send()
      .await
      .map_err(|e| MatcherError::Unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      if body.contains("face could not be detected") {
        return Err(MatcherError::NoFaceDetected);
      }
      return Err(MatcherError::Failed(format!("{}: {}", status, body)));
    }

    response
      .json::<Vec<FaceMatch>>()
      .await
      .map_err(|e| MatcherError::Failed(e.to_string()))
  }
}

/// Deletes the recognition index cache so the next scan picks up gallery
/// changes. Missing files are ignored; other failures are only logged.
pub fn invalidate_index(gallery: &Path) {
  for name in INDEX_CACHE_FILES {
    match std::fs::remove_file(gallery.join(name)) {
      Ok(()) => tracing::info!("Removed face index cache {}", name),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => tracing::warn!("Could not remove face index cache {}: {}", name, e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invalidate_index_removes_cache_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache = dir.path().join("representations_facenet512.pkl");
    let photo = dir.path().join("kept.jpg");
    std::fs::write(&cache, b"stale").unwrap();
    std::fs::write(&photo, b"photo").unwrap();

    invalidate_index(dir.path());

    assert!(!cache.exists());
    assert!(photo.exists());
  }

  #[test]
  fn test_invalidate_index_tolerates_missing_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    invalidate_index(dir.path());
  }

  #[test]
  fn test_face_match_deserializes_sidecar_rows() {
    let body = r#"[{"identity":"/data/db_images/abc_face.jpg","distance":0.41}]"#;
    let rows: Vec<FaceMatch> = serde_json::from_str(body).expect("parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].identity, "/data/db_images/abc_face.jpg");
    assert!((rows[0].distance - 0.41).abs() < f64::EPSILON);
  }

  #[test]
  fn test_client_trims_trailing_slash() {
    let client = FaceApiClient::new("http://localhost:7000/".to_string());
    assert_eq!(client.base_url, "http://localhost:7000");
  }
}
