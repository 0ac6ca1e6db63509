use axum::{
  extract::{Json, Multipart, Path, State},
  http::HeaderMap,
  response::Json as JsonResponse,
  routing::{delete, get, post},
  Router,
};
use chrono::NaiveDate;

use super::model::{AdminReportsResponse, NewReport, ReportView, ReportsResponse, UpdateStatusRequest};
use crate::{
  domains::user::rest::MessageResponse,
  middleware::auth::auth_middleware,
  state::{AppState, SharedAppState},
  AppError,
};

pub fn report_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/report", post(file_report_handler))
    .route("/report/{report_id}", get(get_report_handler))
    .route("/user-reports/{user_id}", get(user_reports_handler))
    .route("/update-status", post(update_status_handler))
    .route("/delete-report/{report_id}", delete(delete_report_handler))
    .route("/admin/all-reports", get(all_reports_handler))
}

fn apply_form_field(input: &mut NewReport, name: &str, value: String) -> Result<(), AppError> {
  if value.is_empty() {
    return Ok(());
  }

  match name {
    "name" => input.name = value,
    "age" => {
      input.age = Some(
        value
          .parse()
          .map_err(|_| AppError::bad_request("Age must be a number"))?,
      )
    }
    "gender" => input.gender = Some(value),
    "location" => input.location = Some(value),
    "last_seen_date" => {
      input.last_seen_date = Some(
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
          .map_err(|_| AppError::bad_request("Last seen date must be formatted as YYYY-MM-DD"))?,
      )
    }
    "description" => input.description = Some(value),
    "phone" => input.phone = Some(value),
    _ => {}
  }

  Ok(())
}

pub async fn file_report_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
  mut multipart: Multipart,
) -> Result<JsonResponse<ReportView>, AppError> {
  let claims = auth_middleware(headers).await?;

  let mut input = NewReport::default();
  let mut photo: Option<(String, Vec<u8>)> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| AppError::bad_request(format!("Invalid multipart payload: {}", e)))?
  {
    let Some(name) = field.name().map(str::to_string) else {
      continue;
    };

    if name == "photo" {
      let file_name = field.file_name().unwrap_or("photo.jpg").to_string();
      let data = field
        .bytes()
        .await
        .map_err(|e| AppError::bad_request(format!("Could not read photo: {}", e)))?;
      photo = Some((file_name, data.to_vec()));
    } else {
      let value = field
        .text()
        .await
        .map_err(|e| AppError::bad_request(format!("Could not read field {}: {}", name, e)))?;
      apply_form_field(&mut input, &name, value)?;
    }
  }

  let (photo_name, photo_bytes) = photo.ok_or_else(|| AppError::bad_request("Missing required fields"))?;

  state
    .file_report(claims.user_id, input, photo_name, photo_bytes)
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

pub async fn get_report_handler(
  State(state): State<SharedAppState>,
  Path(report_id): Path<i32>,
) -> Result<JsonResponse<ReportView>, AppError> {
  state.get_report(report_id).await.map(JsonResponse).map_err(Into::into)
}

pub async fn user_reports_handler(
  State(state): State<SharedAppState>,
  Path(user_id): Path<i32>,
) -> Result<JsonResponse<ReportsResponse>, AppError> {
  state.user_reports(user_id).await.map(JsonResponse).map_err(Into::into)
}

pub async fn update_status_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
  Json(payload): Json<UpdateStatusRequest>,
) -> Result<JsonResponse<MessageResponse>, AppError> {
  auth_middleware(headers).await?;

  state
    .update_status(payload.report_id, payload.status)
    .await
    .map_err(AppError::from)?;

  Ok(JsonResponse(MessageResponse {
    message: "Status updated".to_string(),
  }))
}

pub async fn delete_report_handler(
  State(state): State<SharedAppState>,
  headers: HeaderMap,
  Path(report_id): Path<i32>,
) -> Result<JsonResponse<MessageResponse>, AppError> {
  auth_middleware(headers).await?;

  state.delete_report(report_id).await.map_err(AppError::from)?;

  Ok(JsonResponse(MessageResponse {
    message: "Report deleted".to_string(),
  }))
}

pub async fn all_reports_handler(
  State(state): State<SharedAppState>,
) -> Result<JsonResponse<AdminReportsResponse>, AppError> {
  state.all_reports().await.map(JsonResponse).map_err(Into::into)
}
