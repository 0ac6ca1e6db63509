use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sqlx::MySqlPool;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use crate::domains::report::repository;
use crate::impl_service_error_conversions;
use crate::matcher::{self, FaceMatcher, MatcherError};
use crate::storage::ImageStore;

use super::model::{SearchMatch, SearchResponse};

/// Cosine distance at or below which a gallery hit counts as the same person.
const MATCH_DISTANCE_THRESHOLD: f64 = 0.55;

#[derive(Debug)]
pub enum SearchServiceError {
  BadRequest(String),
  InternalServerError(String),
}

impl Error for SearchServiceError {}

impl std::fmt::Display for SearchServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SearchServiceError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
      SearchServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(SearchServiceError, InternalServerError);

#[async_trait]
pub trait SearchService: Send + Sync {
  async fn search_faces(&self, image_b64: String) -> Result<SearchResponse, SearchServiceError>;
}

pub struct SearchServiceImpl {
  db: MySqlPool,
  store: ImageStore,
  face_matcher: Arc<dyn FaceMatcher>,
}

impl SearchServiceImpl {
  pub fn new(db: MySqlPool, store: ImageStore, face_matcher: Arc<dyn FaceMatcher>) -> Self {
    Self { db, store, face_matcher }
  }

  pub fn similarity_percent(distance: f64) -> f64 {
    ((1.0 - distance) * 10000.0).round() / 100.0
  }

  async fn collect_matches(&self, found: Vec<matcher::FaceMatch>) -> Result<Vec<SearchMatch>, SearchServiceError> {
    let mut matches = Vec::new();

    for hit in found {
      if hit.distance > MATCH_DISTANCE_THRESHOLD {
        continue;
      }

      let Some(filename) = Path::new(&hit.identity).file_name().and_then(|f| f.to_str()) else {
        continue;
      };

      // only gallery files that belong to a report count
      if let Some(report) = repository::find_by_image(&self.db, filename).await? {
        matches.push(SearchMatch {
          report_id: report.id,
          name: report.name,
          similarity: Self::similarity_percent(hit.distance),
          status: report.status,
          photo_path: report.image_path,
        });
      }
    }

    Ok(matches)
  }
}

#[async_trait]
impl SearchService for SearchServiceImpl {
  async fn search_faces(&self, image_b64: String) -> Result<SearchResponse, SearchServiceError> {
    if image_b64.is_empty() {
      return Err(SearchServiceError::BadRequest("No image provided".to_string()));
    }

    // accept both raw base64 and data-URL payloads
    let encoded = match image_b64.split_once(',') {
      Some((_, rest)) => rest,
      None => image_b64.as_str(),
    };

    let bytes = BASE64
      .decode(encoded.trim())
      .map_err(|_| SearchServiceError::BadRequest("Image payload is not valid base64".to_string()))?;

    let query_path = self.store.save_temp_jpeg(&bytes).await.map_err(|e| {
      tracing::warn!("Could not decode query image: {:?}", e);
      SearchServiceError::BadRequest("Image payload could not be decoded".to_string())
    })?;

    // stale index entries would shadow newly filed reports
    matcher::invalidate_index(self.store.root());

    let result = self.face_matcher.find(&query_path, self.store.root()).await;

    if let Err(e) = tokio::fs::remove_file(&query_path).await {
      tracing::warn!("Could not remove query image {}: {}", query_path.display(), e);
    }

    let found = match result {
      Ok(found) => found,
      Err(MatcherError::NoFaceDetected) => {
        return Err(SearchServiceError::BadRequest(
          "Face detection failed. Try a clearer image.".to_string(),
        ))
      }
      Err(e) => {
        tracing::error!("Face matcher call failed: {}", e);
        return Err(SearchServiceError::InternalServerError(
          "Face search is currently unavailable".to_string(),
        ));
      }
    };

    let matches = self.collect_matches(found).await?;
    Ok(SearchResponse { matches })
  }
}
