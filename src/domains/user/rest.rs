use axum::{
  extract::{Json, Path, State},
  response::Json as JsonResponse,
  routing::{get, post},
  Router,
};
use serde::{Deserialize, Serialize};

use super::model::{GoogleAuthRequest, LoginResponse, SendOtpRequest, UserProfile, VerifyLoginOtpRequest,
  VerifyRegisterOtpRequest};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
  pub message: String,
}

pub fn user_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/send-otp", post(send_otp_handler))
    .route("/verify-register-otp", post(verify_register_otp_handler))
    .route("/verify-login-otp", post(verify_login_otp_handler))
    .route("/google-auth", post(google_auth_handler))
    .route("/user/{user_id}", get(get_user_handler))
}

pub async fn send_otp_handler(
  State(state): State<SharedAppState>,
  Json(payload): Json<SendOtpRequest>,
) -> Result<JsonResponse<MessageResponse>, AppError> {
  state.send_otp(payload).await.map_err(AppError::from)?;
  Ok(JsonResponse(MessageResponse {
    message: "OTP sent to email".to_string(),
  }))
}

pub async fn verify_register_otp_handler(
  State(state): State<SharedAppState>,
  Json(payload): Json<VerifyRegisterOtpRequest>,
) -> Result<JsonResponse<MessageResponse>, AppError> {
  state.verify_register_otp(payload).await.map_err(AppError::from)?;
  Ok(JsonResponse(MessageResponse {
    message: "Registration successful".to_string(),
  }))
}

pub async fn verify_login_otp_handler(
  State(state): State<SharedAppState>,
  Json(payload): Json<VerifyLoginOtpRequest>,
) -> Result<JsonResponse<LoginResponse>, AppError> {
  state.verify_login_otp(payload).await.map(JsonResponse).map_err(Into::into)
}

pub async fn google_auth_handler(
  State(state): State<SharedAppState>,
  Json(payload): Json<GoogleAuthRequest>,
) -> Result<JsonResponse<LoginResponse>, AppError> {
  state.google_auth(payload).await.map(JsonResponse).map_err(Into::into)
}

pub async fn get_user_handler(
  State(state): State<SharedAppState>,
  Path(user_id): Path<i32>,
) -> Result<JsonResponse<UserProfile>, AppError> {
  state.get_user(user_id).await.map(JsonResponse).map_err(Into::into)
}

#[cfg(test)]
mod tests {
  use super::super::model::{SendOtpRequest, User, VerifyLoginOtpRequest, VerifyRegisterOtpRequest};
  use crate::test_support::{app_with_pool, get, post_json, STUB_GOOGLE_TOKEN};
  use axum::http::StatusCode;
  use serial_test::serial;

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn send_otp_creates_user_and_stores_code(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool.clone()).await;

    let payload = SendOtpRequest {
      email: "otp@example.com".to_string(),
    };
    let (status, _body) = post_json(app, "/api/send-otp", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let user = User::find_by_email(&pool, "otp@example.com").await?.expect("user row");
    assert_eq!(user.otp.expect("otp").len(), 6);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn send_otp_rejects_invalid_email(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool).await;

    let payload = SendOtpRequest {
      email: "not-an-email".to_string(),
    };
    let (status, _body) = post_json(app, "/api/send-otp", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn register_with_otp_then_login(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool.clone()).await;

    let (status, _) = post_json(
      app.clone(),
      "/api/send-otp",
      &SendOtpRequest {
        email: "flow@example.com".to_string(),
      },
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let otp = User::find_by_email(&pool, "flow@example.com")
      .await?
      .and_then(|u| u.otp)
      .expect("otp");

    let (status, _) = post_json(
      app.clone(),
      "/api/verify-register-otp",
      &VerifyRegisterOtpRequest {
        email: "flow@example.com".to_string(),
        name: "Flow User".to_string(),
        password: "password123".to_string(),
        otp,
      },
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
      app.clone(),
      "/api/send-otp",
      &SendOtpRequest {
        email: "flow@example.com".to_string(),
      },
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let otp = User::find_by_email(&pool, "flow@example.com")
      .await?
      .and_then(|u| u.otp)
      .expect("otp");

    let (status, body) = post_json(
      app,
      "/api/verify-login-otp",
      &VerifyLoginOtpRequest {
        email: "flow@example.com".to_string(),
        otp,
      },
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let login: super::super::model::LoginResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert!(!login.token.is_empty());
    assert_eq!(login.email, "flow@example.com");
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn login_with_wrong_otp_is_unauthorized(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool.clone()).await;

    User::create_placeholder(&pool, "wrong@example.com").await?;
    User::set_otp(
      &pool,
      "wrong@example.com",
      "111111",
      chrono::Utc::now() + chrono::Duration::minutes(5),
    )
    .await?;

    let (status, _) = post_json(
      app,
      "/api/verify-login-otp",
      &VerifyLoginOtpRequest {
        email: "wrong@example.com".to_string(),
        otp: "222222".to_string(),
      },
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn login_with_expired_otp_is_gone(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool.clone()).await;

    User::create_placeholder(&pool, "expired@example.com").await?;
    User::set_otp(
      &pool,
      "expired@example.com",
      "111111",
      chrono::Utc::now() - chrono::Duration::minutes(1),
    )
    .await?;

    let (status, _) = post_json(
      app,
      "/api/verify-login-otp",
      &VerifyLoginOtpRequest {
        email: "expired@example.com".to_string(),
        otp: "111111".to_string(),
      },
    )
    .await;
    assert_eq!(status, StatusCode::GONE);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn google_auth_creates_and_reuses_user(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool).await;

    let payload = serde_json::json!({ "token": STUB_GOOGLE_TOKEN });
    let (status, body) = post_json(app.clone(), "/api/google-auth", &payload).await;
    assert_eq!(status, StatusCode::OK);
    let first: super::super::model::LoginResponse = serde_json::from_slice(&body).expect("deserialize response");

    let (status, body) = post_json(app.clone(), "/api/google-auth", &payload).await;
    assert_eq!(status, StatusCode::OK);
    let second: super::super::model::LoginResponse = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(first.user_id, second.user_id);

    let (status, _) = post_json(app, "/api/google-auth", &serde_json::json!({ "token": "bogus" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
  }

  #[sqlx::test(migrations = "./migrations")]
  #[serial]
  async fn get_user_profile(pool: sqlx::MySqlPool) -> Result<(), sqlx::Error> {
    let app = app_with_pool(pool.clone()).await;

    let user = User::create_placeholder(&pool, "profile@example.com").await?;

    let (status, body) = get(app.clone(), &format!("/api/user/{}", user.id)).await;
    assert_eq!(status, StatusCode::OK);

    let profile: super::super::model::UserProfile = serde_json::from_slice(&body).expect("deserialize response");
    assert_eq!(profile.email, "profile@example.com");
    assert!(!String::from_utf8_lossy(&body).contains("otp"));

    let (status, _) = get(app, "/api/user/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
  }
}
