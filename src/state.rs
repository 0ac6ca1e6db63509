use std::sync::Arc;

use sqlx::MySqlPool;

use crate::domains::document::{
  model::{PdfFile, QrResponse, ReportUrlResponse},
  service::{DocumentService, DocumentServiceError, DocumentServiceImpl},
};
use crate::domains::report::{
  model::{AdminReportsResponse, NewReport, ReportView, ReportsResponse},
  service::{ReportService, ReportServiceError, ReportServiceImpl},
};
use crate::domains::search::{
  model::SearchResponse,
  service::{SearchService, SearchServiceError, SearchServiceImpl},
};
use crate::domains::user::{
  model::{
    GoogleAuthRequest, LoginResponse, SendOtpRequest, UserProfile, VerifyLoginOtpRequest, VerifyRegisterOtpRequest,
  },
  repository::SqlxUserRepository,
  service::{UserService, UserServiceError, UserServiceImpl},
};
use crate::email::EmailService;
use crate::matcher::FaceMatcher;
use crate::storage::ImageStore;
use crate::utils::google::GoogleTokenVerifier;

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_otp(&self, req: SendOtpRequest) -> impl std::future::Future<Output = Result<(), UserServiceError>> + Send;
  fn verify_register_otp(
    &self,
    req: VerifyRegisterOtpRequest,
  ) -> impl std::future::Future<Output = Result<(), UserServiceError>> + Send;
  fn verify_login_otp(
    &self,
    req: VerifyLoginOtpRequest,
  ) -> impl std::future::Future<Output = Result<LoginResponse, UserServiceError>> + Send;
  fn google_auth(
    &self,
    req: GoogleAuthRequest,
  ) -> impl std::future::Future<Output = Result<LoginResponse, UserServiceError>> + Send;
  fn get_user(&self, user_id: i32) -> impl std::future::Future<Output = Result<UserProfile, UserServiceError>> + Send;

  fn file_report(
    &self,
    user_id: i32,
    input: NewReport,
    photo_name: String,
    photo_bytes: Vec<u8>,
  ) -> impl std::future::Future<Output = Result<ReportView, ReportServiceError>> + Send;
  fn get_report(
    &self,
    report_id: i32,
  ) -> impl std::future::Future<Output = Result<ReportView, ReportServiceError>> + Send;
  fn user_reports(
    &self,
    user_id: i32,
  ) -> impl std::future::Future<Output = Result<ReportsResponse, ReportServiceError>> + Send;
  fn all_reports(&self) -> impl std::future::Future<Output = Result<AdminReportsResponse, ReportServiceError>> + Send;
  fn update_status(
    &self,
    report_id: i32,
    status: String,
  ) -> impl std::future::Future<Output = Result<(), ReportServiceError>> + Send;
  fn delete_report(&self, report_id: i32) -> impl std::future::Future<Output = Result<(), ReportServiceError>> + Send;

  fn search_faces(
    &self,
    image_b64: String,
  ) -> impl std::future::Future<Output = Result<SearchResponse, SearchServiceError>> + Send;

  fn report_qr(
    &self,
    report_id: i32,
  ) -> impl std::future::Future<Output = Result<QrResponse, DocumentServiceError>> + Send;
  fn report_url(&self, report_id: i32) -> ReportUrlResponse;
  fn report_pdf(
    &self,
    report_id: i32,
  ) -> impl std::future::Future<Output = Result<PdfFile, DocumentServiceError>> + Send;
  fn report_poster(
    &self,
    report_id: i32,
  ) -> impl std::future::Future<Output = Result<PdfFile, DocumentServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub store: ImageStore,
  pub user_service: Arc<UserServiceImpl<SqlxUserRepository>>,
  pub report_service: Arc<ReportServiceImpl>,
  pub search_service: Arc<SearchServiceImpl>,
  pub document_service: Arc<DocumentServiceImpl>,
}

impl SharedAppState {
  pub async fn new(
    pool: MySqlPool,
    email_service: EmailService,
    store: ImageStore,
    face_matcher: Arc<dyn FaceMatcher>,
    google_verifier: Arc<dyn GoogleTokenVerifier>,
  ) -> Self {
    let base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let frontend_url = std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5500".to_string());

    let user_repository = SqlxUserRepository::new(pool.clone());
    let user_service = Arc::new(UserServiceImpl::new(user_repository, email_service, google_verifier));
    let report_service = Arc::new(ReportServiceImpl::new(pool.clone(), store.clone(), base_url.clone()));
    let search_service = Arc::new(SearchServiceImpl::new(pool.clone(), store.clone(), face_matcher));
    let document_service = Arc::new(DocumentServiceImpl::new(pool, store.clone(), base_url, frontend_url));

    Self {
      store,
      user_service,
      report_service,
      search_service,
      document_service,
    }
  }
}

impl AppState for SharedAppState {
  async fn send_otp(&self, req: SendOtpRequest) -> Result<(), UserServiceError> {
    self.user_service.send_otp(req).await
  }

  async fn verify_register_otp(&self, req: VerifyRegisterOtpRequest) -> Result<(), UserServiceError> {
    self.user_service.verify_register_otp(req).await
  }

  async fn verify_login_otp(&self, req: VerifyLoginOtpRequest) -> Result<LoginResponse, UserServiceError> {
    self.user_service.verify_login_otp(req).await
  }

  async fn google_auth(&self, req: GoogleAuthRequest) -> Result<LoginResponse, UserServiceError> {
    self.user_service.google_auth(req).await
  }

  async fn get_user(&self, user_id: i32) -> Result<UserProfile, UserServiceError> {
    self.user_service.get_user(user_id).await
  }

  async fn file_report(
    &self,
    user_id: i32,
    input: NewReport,
    photo_name: String,
    photo_bytes: Vec<u8>,
  ) -> Result<ReportView, ReportServiceError> {
    self
      .report_service
      .file_report(user_id, input, photo_name, photo_bytes)
      .await
  }

  async fn get_report(&self, report_id: i32) -> Result<ReportView, ReportServiceError> {
    self.report_service.get_report(report_id).await
  }

  async fn user_reports(&self, user_id: i32) -> Result<ReportsResponse, ReportServiceError> {
    self.report_service.user_reports(user_id).await
  }

  async fn all_reports(&self) -> Result<AdminReportsResponse, ReportServiceError> {
    self.report_service.all_reports().await
  }

  async fn update_status(&self, report_id: i32, status: String) -> Result<(), ReportServiceError> {
    self.report_service.update_status(report_id, status).await
  }

  async fn delete_report(&self, report_id: i32) -> Result<(), ReportServiceError> {
    self.report_service.delete_report(report_id).await
  }

  async fn search_faces(&self, image_b64: String) -> Result<SearchResponse, SearchServiceError> {
    self.search_service.search_faces(image_b64).await
  }

  async fn report_qr(&self, report_id: i32) -> Result<QrResponse, DocumentServiceError> {
    self.document_service.report_qr(report_id).await
  }

  fn report_url(&self, report_id: i32) -> ReportUrlResponse {
    self.document_service.report_url(report_id)
  }

  async fn report_pdf(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError> {
    self.document_service.report_pdf(report_id).await
  }

  async fn report_poster(&self, report_id: i32) -> Result<PdfFile, DocumentServiceError> {
    self.document_service.report_poster(report_id).await
  }
}
