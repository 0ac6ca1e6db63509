use axum::{
  body::Body,
  extract::{Path, State},
  http::header,
  response::{Json as JsonResponse, Response},
  routing::get,
  Router,
};

use super::model::{PdfFile, QrResponse, ReportUrlResponse};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

pub fn document_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/report-qr/{report_id}", get(report_qr_handler))
    .route("/report-url/{report_id}", get(report_url_handler))
    .route("/report-pdf/{report_id}", get(report_pdf_handler))
    .route("/report-poster/{report_id}", get(report_poster_handler))
}

fn pdf_response(file: PdfFile) -> Result<Response, AppError> {
  Response::builder()
    .header(header::CONTENT_TYPE, "application/pdf")
    .header(
      header::CONTENT_DISPOSITION,
      format!("attachment; filename=\"{}\"", file.filename),
    )
    .body(Body::from(file.bytes))
    .map_err(|e| AppError::internal_server_error(format!("Failed to build PDF response: {}", e)))
}

pub async fn report_qr_handler(
  State(state): State<SharedAppState>,
  Path(report_id): Path<i32>,
) -> Result<JsonResponse<QrResponse>, AppError> {
  state.report_qr(report_id).await.map(JsonResponse).map_err(Into::into)
}

pub async fn report_url_handler(
  State(state): State<SharedAppState>,
  Path(report_id): Path<i32>,
) -> JsonResponse<ReportUrlResponse> {
  JsonResponse(state.report_url(report_id))
}

pub async fn report_pdf_handler(
  State(state): State<SharedAppState>,
  Path(report_id): Path<i32>,
) -> Result<Response, AppError> {
  let file = state.report_pdf(report_id).await.map_err(AppError::from)?;
  pdf_response(file)
}

pub async fn report_poster_handler(
  State(state): State<SharedAppState>,
  Path(report_id): Path<i32>,
) -> Result<Response, AppError> {
  let file = state.report_poster(report_id).await.map_err(AppError::from)?;
  pdf_response(file)
}

#[cfg(test)]
mod tests {
  use crate::domains::report::{model::NewReport, repository};
  use crate::domains::user::model::User;
  use crate::test_support::{get, get_raw, state_with_pool, tiny_png_bytes};
  use axum::http::{header, StatusCode};
  use serial_test::serial;

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn report_qr_unknown_report(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let state = state_with_pool(pool).await;
    let app = crate::app::create_app(state);

    let (status, _) = get(app, "/api/report-qr/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn report_qr_writes_png_into_store(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let state = state_with_pool(pool.clone()).await;
    let app = crate::app::create_app(state.clone());

    let user = User::create_placeholder(&pool, "qr@example.com").await?;
    let report = repository::create(
      &pool,
      user.id,
      &NewReport {
        name: "QR Case".to_string(),
        ..Default::default()
      },
      "qr-case.jpg",
    )
    .await?;

    let (status, body) = get(app, &format!("/api/report-qr/{}", report.id)).await;
    assert_eq!(status, StatusCode::OK);

    let response: super::super::model::QrResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert!(response.qr_url.ends_with(&format!("/images/qr_{}.png", report.id)));

    let stored = state.store.path_for(&format!("qr_{}.png", report.id)).expect("path");
    assert!(stored.exists());
    let png = std::fs::read(stored).expect("read png");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn report_url_builds_public_link(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let state = state_with_pool(pool).await;
    let app = crate::app::create_app(state);

    let (status, body) = get(app, "/api/report-url/12").await;
    assert_eq!(status, StatusCode::OK);

    let response: super::super::model::ReportUrlResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert!(response.url.ends_with("/report/12"));
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn report_pdf_is_attachment(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let state = state_with_pool(pool.clone()).await;
    let app = crate::app::create_app(state);

    let user = User::create_placeholder(&pool, "pdf@example.com").await?;
    let report = repository::create(
      &pool,
      user.id,
      &NewReport {
        name: "Pdf Case".to_string(),
        ..Default::default()
      },
      "pdf-case.jpg",
    )
    .await?;

    let response = get_raw(app, &format!("/api/report-pdf/{}", report.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers().get(header::CONTENT_TYPE).map(|v| v.to_str().unwrap()),
      Some("application/pdf")
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF"));
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn report_poster_requires_photo_on_disk(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let state = state_with_pool(pool.clone()).await;
    let app = crate::app::create_app(state.clone());

    let user = User::create_placeholder(&pool, "poster@example.com").await?;
    let report = repository::create(
      &pool,
      user.id,
      &NewReport {
        name: "Poster Case".to_string(),
        ..Default::default()
      },
      "poster-case.png",
    )
    .await?;

    // no photo on disk yet
    let (status, _) = get(app.clone(), &format!("/api/report-poster/{}", report.id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    state
      .store
      .write_file("poster-case.png", &tiny_png_bytes())
      .await
      .expect("seed photo");

    let response = get_raw(app, &format!("/api/report-poster/{}", report.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
      .headers()
      .get(header::CONTENT_DISPOSITION)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
      .to_string();
    assert!(disposition.contains("FindMe_Report_Poster Case.pdf"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF"));
    Ok(())
  }
}
