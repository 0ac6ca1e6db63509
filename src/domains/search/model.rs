use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
  pub image: String,
}

/// A gallery hit above the confidence cutoff, joined back to its report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchMatch {
  pub report_id: i32,
  pub name: String,
  pub similarity: f64,
  pub status: String,
  pub photo_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
  pub matches: Vec<SearchMatch>,
}
