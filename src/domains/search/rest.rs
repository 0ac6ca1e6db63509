use axum::{
  extract::{Json, State},
  response::Json as JsonResponse,
  routing::post,
  Router,
};

use super::model::{SearchRequest, SearchResponse};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn search_routes() -> Router<SharedAppState> {
  Router::new().route("/search", post(search_handler))
}

pub async fn search_handler(
  State(state): State<SharedAppState>,
  Json(payload): Json<SearchRequest>,
) -> Result<JsonResponse<SearchResponse>, AppError> {
  state
    .search_faces(payload.image)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

#[cfg(test)]
mod tests {
  use crate::domains::report::{model::NewReport, repository};
  use crate::domains::user::model::User;
  use crate::matcher::FaceMatch;
  use crate::test_support::{app_with_matcher, app_with_pool, post_json, tiny_png_b64};
  use axum::http::StatusCode;
  use serial_test::serial;
  use std::sync::Arc;

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn search_with_no_matches_returns_empty_list(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool).await;

    let payload = serde_json::json!({ "image": tiny_png_b64() });
    let (status, body) = post_json(app, "/api/search", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: super::super::model::SearchResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert!(response.matches.is_empty());
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn search_rejects_bad_base64(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool).await;

    let payload = serde_json::json!({ "image": "@@@not-base64@@@" });
    let (status, _) = post_json(app, "/api/search", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn search_filters_by_threshold_and_joins_reports(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let user = User::create_placeholder(&pool, "searcher@example.com").await?;
    let close = repository::create(
      &pool,
      user.id,
      &NewReport {
        name: "Close Match".to_string(),
        ..Default::default()
      },
      "close.jpg",
    )
    .await?;
    repository::create(
      &pool,
      user.id,
      &NewReport {
        name: "Far Match".to_string(),
        ..Default::default()
      },
      "far.jpg",
    )
    .await?;

    let matcher = Arc::new(crate::test_support::StubMatcher {
      matches: vec![
        FaceMatch {
          identity: "/gallery/close.jpg".to_string(),
          distance: 0.20,
        },
        FaceMatch {
          identity: "/gallery/far.jpg".to_string(),
          distance: 0.90,
        },
        FaceMatch {
          identity: "/gallery/unknown.jpg".to_string(),
          distance: 0.10,
        },
      ],
    });
    let app = app_with_matcher(pool, matcher).await;

    let payload = serde_json::json!({ "image": tiny_png_b64() });
    let (status, body) = post_json(app, "/api/search", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let response: super::super::model::SearchResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].report_id, close.id);
    assert_eq!(response.matches[0].name, "Close Match");
    assert_eq!(response.matches[0].similarity, 80.0);
    Ok(())
  }
}
