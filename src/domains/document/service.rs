use async_trait::async_trait;
use sqlx::MySqlPool;
use std::error::Error;

use crate::domains::report::repository;
use crate::impl_service_error_conversions;
use crate::storage::ImageStore;

use super::model::{PdfFile, QrResponse, ReportUrlResponse};
use super::{pdf, qr};

#[derive(Debug)]
pub enum DocumentServiceError {
  NotFound(String),
  InternalServerError(String),
}

impl Error for DocumentServiceError {}

impl std::fmt::Display for DocumentServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DocumentServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
      DocumentServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(DocumentServiceError, InternalServerError);

#[async_trait]
pub trait DocumentService: Send + Sync {
  async fn report_qr(&self, report_id: i32) -> Result<QrResponse, DocumentServiceError>;
  fn report_url(&self, report_id: i32) -> ReportUrlResponse;
  async fn report_pdf(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError>;
  async fn report_poster(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError>;
}

pub struct DocumentServiceImpl {
  db: MySqlPool,
  store: ImageStore,
  base_url: String,
  frontend_url: String,
}

impl DocumentServiceImpl {
  pub fn new(db: MySqlPool, store: ImageStore, base_url: String, frontend_url: String) -> Self {
    Self {
      db,
      store,
      base_url,
      frontend_url,
    }
  }

  async fn load_report(
    &self,
    report_id: i32,
  ) -> Result<crate::domains::report::model::Report, DocumentServiceError> {
    repository::find_by_id(&self.db, report_id)
      .await?
      .ok_or_else(|| DocumentServiceError::NotFound("Report not found".to_string()))
  }
}

#[async_trait]
impl DocumentService for DocumentServiceImpl {
  async fn report_qr(&self, report_id: i32) -> Result<QrResponse, DocumentServiceError> {
    let report = self.load_report(report_id).await?;

    let target = format!("{}/report-details?id={}", self.frontend_url, report.id);
    let png = qr::qr_png_bytes(&target).map_err(|e| {
      tracing::error!("QR rendering failed: {:?}", e);
      DocumentServiceError::InternalServerError("Failed to generate QR code".to_string())
    })?;

    let filename = format!("qr_{}.png", report.id);
    self.store.write_file(&filename, &png).await.map_err(|e| {
      tracing::error!("Could not store QR code: {:?}", e);
      DocumentServiceError::InternalServerError("Failed to store QR code".to_string())
    })?;

    Ok(QrResponse {
      qr_url: format!("{}/images/{}", self.base_url, filename),
    })
  }

  fn report_url(&self, report_id: i32) -> ReportUrlResponse {
    ReportUrlResponse {
      url: format!("{}/report/{}", self.base_url, report_id),
    }
  }

  async fn report_pdf(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError> {
    let report = self.load_report(report_id).await?;

    let bytes = pdf::summary_pdf(&report).map_err(|e| {
      tracing::error!("Summary PDF rendering failed: {:?}", e);
      DocumentServiceError::InternalServerError("Failed to generate PDF".to_string())
    })?;

    Ok(PdfFile {
      filename: "report.pdf".to_string(),
      bytes,
    })
  }

  async fn report_poster(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError> {
    let report = self.load_report(report_id).await?;

    let photo_path = self
      .store
      .path_for(&report.image_path)
      .ok_or_else(|| DocumentServiceError::InternalServerError("Image not found on server".to_string()))?;
    let photo = tokio::fs::read(&photo_path).await.map_err(|e| {
      tracing::error!("Poster photo {} unreadable: {}", photo_path.display(), e);
      DocumentServiceError::InternalServerError("Image not found on server".to_string())
    })?;

    let link = format!("{}/report/{}", self.base_url, report.id);
    let qr_png = qr::qr_png_bytes(&link).map_err(|e| {
      tracing::error!("QR rendering failed: {:?}", e);
      DocumentServiceError::InternalServerError("Failed to generate QR code".to_string())
    })?;

    let bytes = pdf::poster_pdf(&report, &photo, &qr_png).map_err(|e| {
      tracing::error!("Poster rendering failed: {:?}", e);
      DocumentServiceError::InternalServerError("Failed to generate poster".to_string())
    })?;

    Ok(PdfFile {
      filename: format!("FindMe_Report_{}.pdf", report.name.replace(['"', '\n', '\r'], "")),
      bytes,
    })
  }
}
