use async_trait::async_trait;
use sqlx::MySqlPool;
use std::error::Error;

use crate::impl_service_error_conversions;
use crate::matcher;
use crate::storage::ImageStore;

use super::model::{
  AdminReportsResponse, NewReport, ReportView, ReportsResponse, STATUS_FOUND, STATUS_PENDING,
};
use super::repository;

#[derive(Debug)]
pub enum ReportServiceError {
  BadRequest(String),
  NotFound(String),
  InternalServerError(String),
}

impl Error for ReportServiceError {}

impl std::fmt::Display for ReportServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportServiceError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
      ReportServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
      ReportServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(ReportServiceError, InternalServerError);

#[async_trait]
pub trait ReportService: Send + Sync {
  async fn file_report(
    &self,
    user_id: i32,
    input: NewReport,
    photo_name: String,
    photo_bytes: Vec<u8>,
  ) -> Result<ReportView, ReportServiceError>;
  async fn get_report(&self, report_id: i32) -> Result<ReportView, ReportServiceError>;
  async fn user_reports(&self, user_id: i32) -> Result<ReportsResponse, ReportServiceError>;
  async fn all_reports(&self) -> Result<AdminReportsResponse, ReportServiceError>;
  async fn update_status(&self, report_id: i32, status: String) -> Result<(), ReportServiceError>;
  async fn delete_report(&self, report_id: i32) -> Result<(), ReportServiceError>;
}

pub struct ReportServiceImpl {
  db: MySqlPool,
  store: ImageStore,
  base_url: String,
}

impl ReportServiceImpl {
  pub fn new(db: MySqlPool, store: ImageStore, base_url: String) -> Self {
    Self { db, store, base_url }
  }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
  async fn file_report(
    &self,
    user_id: i32,
    input: NewReport,
    photo_name: String,
    photo_bytes: Vec<u8>,
  ) -> Result<ReportView, ReportServiceError> {
    if input.name.trim().is_empty() {
      return Err(ReportServiceError::BadRequest("Missing required fields".to_string()));
    }
    if photo_bytes.is_empty() {
      return Err(ReportServiceError::BadRequest("A photo is required".to_string()));
    }

    let filename = self.store.save_upload(&photo_name, &photo_bytes).await.map_err(|e| {
      tracing::error!("Failed to store report photo: {:?}", e);
      ReportServiceError::InternalServerError("Failed to store photo".to_string())
    })?;

    let report = repository::create(&self.db, user_id, &input, &filename).await?;

    // the gallery changed, the next scan must re-index
    matcher::invalidate_index(self.store.root());

    Ok(ReportView::from_report(report, &self.base_url))
  }

  async fn get_report(&self, report_id: i32) -> Result<ReportView, ReportServiceError> {
    let report = repository::find_by_id(&self.db, report_id)
      .await?
      .ok_or_else(|| ReportServiceError::NotFound("Report not found".to_string()))?;

    Ok(ReportView::from_report(report, &self.base_url))
  }

  async fn user_reports(&self, user_id: i32) -> Result<ReportsResponse, ReportServiceError> {
    let reports = repository::find_by_user(&self.db, user_id).await?;
    Ok(ReportsResponse {
      reports: reports
        .into_iter()
        .map(|r| ReportView::from_report(r, &self.base_url))
        .collect(),
    })
  }

  async fn all_reports(&self) -> Result<AdminReportsResponse, ReportServiceError> {
    let reports = repository::find_all_with_users(&self.db).await?;
    Ok(AdminReportsResponse { reports })
  }

  async fn update_status(&self, report_id: i32, status: String) -> Result<(), ReportServiceError> {
    if status != STATUS_PENDING && status != STATUS_FOUND {
      return Err(ReportServiceError::BadRequest(format!(
        "Status must be either '{}' or '{}'",
        STATUS_PENDING, STATUS_FOUND
      )));
    }

    // MySQL reports zero affected rows for a no-op update, so existence is
    // checked separately instead of relying on the update count.
    repository::find_by_id(&self.db, report_id)
      .await?
      .ok_or_else(|| ReportServiceError::NotFound("Report not found".to_string()))?;

    repository::update_status(&self.db, report_id, &status).await?;

    Ok(())
  }

  async fn delete_report(&self, report_id: i32) -> Result<(), ReportServiceError> {
    let report = repository::find_by_id(&self.db, report_id)
      .await?
      .ok_or_else(|| ReportServiceError::NotFound("Report not found".to_string()))?;

    repository::delete(&self.db, report_id).await?;

    // the row is gone either way; a stuck file only costs disk space
    if let Err(e) = self.store.delete(&report.image_path).await {
      tracing::warn!("Could not remove photo {}: {:?}", report.image_path, e);
    }

    matcher::invalidate_index(self.store.root());

    Ok(())
  }
}
