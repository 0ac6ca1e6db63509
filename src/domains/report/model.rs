use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_FOUND: &str = "found";

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Report {
  pub id: i32,
  pub user_id: i32,
  pub name: String,
  pub age: Option<i32>,
  pub gender: Option<String>,
  pub location: Option<String>,
  pub last_seen_date: Option<NaiveDate>,
  pub description: Option<String>,
  pub phone: Option<String>,
  pub image_path: String,
  pub status: String,
  pub filed_at: Option<DateTime<Utc>>,
}

/// Fields of a new report as parsed from the multipart form; the photo travels
/// separately.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewReport {
  pub name: String,
  pub age: Option<i32>,
  pub gender: Option<String>,
  pub location: Option<String>,
  pub last_seen_date: Option<NaiveDate>,
  pub description: Option<String>,
  pub phone: Option<String>,
}

/// A report as returned to clients: `image_path` stays internal, `photo_path`
/// is the absolute URL the photo is served from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportView {
  pub id: i32,
  pub user_id: i32,
  pub name: String,
  pub age: Option<i32>,
  pub gender: Option<String>,
  pub location: Option<String>,
  pub last_seen_date: Option<NaiveDate>,
  pub description: Option<String>,
  pub phone: Option<String>,
  pub status: String,
  pub filed_at: Option<DateTime<Utc>>,
  pub photo_path: String,
}

impl ReportView {
  pub fn from_report(report: Report, base_url: &str) -> Self {
    let photo_path = format!("{}/images/{}", base_url, report.image_path);
    Self {
      id: report.id,
      user_id: report.user_id,
      name: report.name,
      age: report.age,
      gender: report.gender,
      location: report.location,
      last_seen_date: report.last_seen_date,
      description: report.description,
      phone: report.phone,
      status: report.status,
      filed_at: report.filed_at,
      photo_path,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsResponse {
  pub reports: Vec<ReportView>,
}

/// Row of the admin listing: every report joined with its reporter.
#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct AdminReport {
  pub id: i32,
  pub user_id: i32,
  pub name: String,
  pub age: Option<i32>,
  pub gender: Option<String>,
  pub location: Option<String>,
  pub last_seen_date: Option<NaiveDate>,
  pub description: Option<String>,
  pub phone: Option<String>,
  pub image_path: String,
  pub status: String,
  pub filed_at: Option<DateTime<Utc>>,
  pub user_name: Option<String>,
  pub user_email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminReportsResponse {
  pub reports: Vec<AdminReport>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStatusRequest {
  pub report_id: i32,
  pub status: String,
}
