use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::error::Error;
use std::sync::Arc;
use validator::Validate;

use super::{
  model::{
    GoogleAuthRequest, LoginResponse, SendOtpRequest, User, UserProfile, VerifyLoginOtpRequest,
    VerifyRegisterOtpRequest,
  },
  repository::UserRepository,
};
use crate::{
  email::EmailService,
  utils::{
    google::GoogleTokenVerifier,
    jwt::{encode_jwt, Claims},
  },
};

const OTP_EMAIL_SUBJECT: &str = "FindMe OTP Verification";
const OTP_TTL_MINUTES: i64 = 5;
const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug)]
pub enum UserServiceError {
  Unauthorized(String),
  ValidationError(String),
  InternalServerError(String),
  InvalidOtp(String),
  OtpExpired(String),
  UserNotFound(String),
}

impl Error for UserServiceError {}

impl std::fmt::Display for UserServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
      UserServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
      UserServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
      UserServiceError::InvalidOtp(msg) => write!(f, "Invalid OTP: {}", msg),
      UserServiceError::OtpExpired(msg) => write!(f, "OTP Expired: {}", msg),
      UserServiceError::UserNotFound(msg) => write!(f, "User Not Found: {}", msg),
    }
  }
}

impl From<sqlx::Error> for UserServiceError {
  fn from(err: sqlx::Error) -> Self {
    UserServiceError::InternalServerError(format!("Database error: {}", err))
  }
}

#[async_trait]
pub trait UserService: Send + Sync {
  async fn send_otp(&self, req: SendOtpRequest) -> Result<(), UserServiceError>;
  async fn verify_register_otp(&self, req: VerifyRegisterOtpRequest) -> Result<(), UserServiceError>;
  async fn verify_login_otp(&self, req: VerifyLoginOtpRequest) -> Result<LoginResponse, UserServiceError>;
  async fn google_auth(&self, req: GoogleAuthRequest) -> Result<LoginResponse, UserServiceError>;
  async fn get_user(&self, user_id: i32) -> Result<UserProfile, UserServiceError>;
}

pub struct UserServiceImpl<U> {
  user_repository: U,
  email_service: EmailService,
  google_verifier: Arc<dyn GoogleTokenVerifier>,
}

impl<U> UserServiceImpl<U>
where
  U: UserRepository,
{
  pub fn new(user_repository: U, email_service: EmailService, google_verifier: Arc<dyn GoogleTokenVerifier>) -> Self {
    Self {
      user_repository,
      email_service,
      google_verifier,
    }
  }

  fn issue_login(&self, user: &User) -> Result<LoginResponse, UserServiceError> {
    let expiration = Utc::now()
      .checked_add_signed(Duration::hours(SESSION_TTL_HOURS))
      .ok_or_else(|| UserServiceError::InternalServerError("Failed to calculate expiration time".to_string()))?
      .timestamp() as usize;

    let claims = Claims {
      sub: user.email.clone(),
      exp: expiration,
      user_id: user.id,
    };

    let token =
      encode_jwt(claims).map_err(|e| UserServiceError::InternalServerError(format!("JWT encoding failed: {}", e)))?;

    Ok(LoginResponse {
      token,
      user_id: user.id,
      email: user.email.clone(),
      name: user.name.clone().unwrap_or_default(),
    })
  }

  fn check_otp(user: &User, otp: &str) -> Result<(), UserServiceError> {
    match user.otp.as_deref() {
      Some(stored) if stored == otp => {}
      _ => return Err(UserServiceError::InvalidOtp("Invalid or expired OTP".to_string())),
    }

    match user.otp_expires {
      Some(expires_at) if expires_at > Utc::now() => Ok(()),
      _ => Err(UserServiceError::OtpExpired("The OTP has expired".to_string())),
    }
  }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
  U: UserRepository,
{
  async fn send_otp(&self, req: SendOtpRequest) -> Result<(), UserServiceError> {
    req
      .validate()
      .map_err(|e| UserServiceError::ValidationError(format!("Validation failed: {}", e)))?;

    if self.user_repository.find_by_email(&req.email).await?.is_none() {
      self.user_repository.create_placeholder(&req.email).await?;
    }

    let otp = crate::utils::generate_otp();
    let expires_at = Utc::now()
      .checked_add_signed(Duration::minutes(OTP_TTL_MINUTES))
      .ok_or_else(|| UserServiceError::InternalServerError("Failed to calculate expiration time".to_string()))?;

    self.user_repository.set_otp(&req.email, &otp, expires_at).await?;

    let body = EmailService::build_otp_email_body(&otp);
    match self
      .email_service
      .send_simple_text_email(&req.email, OTP_EMAIL_SUBJECT, &body)
      .await
    {
      Ok(_) => tracing::info!("OTP email sent to {}", req.email),
      Err(e) => tracing::error!("Failed to send OTP email to {}: {:?}", req.email, e),
    }

    Ok(())
  }

  async fn verify_register_otp(&self, req: VerifyRegisterOtpRequest) -> Result<(), UserServiceError> {
    req
      .validate()
      .map_err(|e| UserServiceError::ValidationError(format!("Validation failed: {}", e)))?;
    crate::utils::validate_password(&req.password)
      .map_err(|e| UserServiceError::ValidationError(format!("Validation failed: {}", e.code)))?;

    let user = self
      .user_repository
      .find_by_email(&req.email)
      .await?
      .ok_or_else(|| UserServiceError::InvalidOtp("Invalid or expired OTP".to_string()))?;

    Self::check_otp(&user, &req.otp)?;

    let password_hash = crate::utils::hash_password(&req.password);
    self
      .user_repository
      .complete_registration(&req.email, &req.name, &password_hash)
      .await?;

    Ok(())
  }

  async fn verify_login_otp(&self, req: VerifyLoginOtpRequest) -> Result<LoginResponse, UserServiceError> {
    req
      .validate()
      .map_err(|e| UserServiceError::ValidationError(format!("Validation failed: {}", e)))?;

    let user = self
      .user_repository
      .find_by_email(&req.email)
      .await?
      .ok_or_else(|| UserServiceError::InvalidOtp("Invalid or expired OTP".to_string()))?;

    Self::check_otp(&user, &req.otp)?;

    // A code grants exactly one login.
    self.user_repository.clear_otp(&req.email).await?;

    self.issue_login(&user)
  }

  async fn google_auth(&self, req: GoogleAuthRequest) -> Result<LoginResponse, UserServiceError> {
    let profile = self.google_verifier.verify(&req.token).await.map_err(|e| {
      tracing::warn!("Google token verification failed: {:?}", e);
      UserServiceError::Unauthorized("Invalid Google token".to_string())
    })?;

    let user = match self.user_repository.find_by_email(&profile.email).await? {
      Some(user) => user,
      None => {
        self
          .user_repository
          .create_google_user(profile.name.as_deref(), &profile.email, &profile.google_id)
          .await?
      }
    };

    self.issue_login(&user)
  }

  async fn get_user(&self, user_id: i32) -> Result<UserProfile, UserServiceError> {
    let user = self
      .user_repository
      .find_by_id(user_id)
      .await?
      .ok_or_else(|| UserServiceError::UserNotFound("User not found".to_string()))?;

    Ok(UserProfile::from(user))
  }
}
