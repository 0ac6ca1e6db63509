use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlExecutor, MySqlPool};
use validator::Validate;

#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct User {
  pub id: i32,
  pub name: Option<String>,
  pub email: String,
  pub password: Option<String>,
  pub google_id: Option<String>,
  pub otp: Option<String>,
  pub otp_expires: Option<DateTime<Utc>>,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SendOtpRequest {
  #[validate(email(message = "a valid email address is required"))]
  pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct VerifyRegisterOtpRequest {
  #[validate(email(message = "a valid email address is required"))]
  pub email: String,
  #[validate(length(min = 1, max = 255, message = "name is required"))]
  pub name: String,
  #[validate(length(min = 8, message = "password must be at least 8 characters"))]
  pub password: String,
  #[validate(length(equal = 6, message = "the verification code has 6 digits"))]
  pub otp: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct VerifyLoginOtpRequest {
  #[validate(email(message = "a valid email address is required"))]
  pub email: String,
  #[validate(length(equal = 6, message = "the verification code has 6 digits"))]
  pub otp: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleAuthRequest {
  pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub user_id: i32,
  pub email: String,
  pub name: String,
}

/// Public view of a user row; OTP and credential columns never leave the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserProfile {
  pub id: i32,
  pub name: Option<String>,
  pub email: String,
  pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserProfile {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name,
      email: user.email,
      created_at: user.created_at,
    }
  }
}

const USER_COLUMNS: &str = "id, name, email, password, google_id, otp, otp_expires, created_at";

impl User {
  pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
  where
    E: MySqlExecutor<'e>,
  {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
      .bind(email)
      .fetch_optional(executor)
      .await
  }

  pub async fn find_by_id<'e, E>(executor: E, id: i32) -> Result<Option<User>, sqlx::Error>
  where
    E: MySqlExecutor<'e>,
  {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
      .bind(id)
      .fetch_optional(executor)
      .await
  }

  /// Inserts a row carrying only the email address; everything else is filled
  /// in when the OTP registration completes.
  pub async fn create_placeholder(db: &MySqlPool, email: &str) -> Result<User, sqlx::Error> {
    sqlx::query("INSERT INTO users (email) VALUES (?)")
      .bind(email)
      .execute(db)
      .await?;

    Self::find_by_email(db, email).await?.ok_or(sqlx::Error::RowNotFound)
  }

  pub async fn set_otp<'e, E>(
    executor: E,
    email: &str,
    otp: &str,
    expires_at: DateTime<Utc>,
  ) -> Result<(), sqlx::Error>
  where
    E: MySqlExecutor<'e>,
  {
    sqlx::query("UPDATE users SET otp = ?, otp_expires = ? WHERE email = ?")
      .bind(otp)
      .bind(expires_at)
      .bind(email)
      .execute(executor)
      .await?;

    Ok(())
  }

  pub async fn complete_registration<'e, E>(
    executor: E,
    email: &str,
    name: &str,
    password_hash: &str,
  ) -> Result<(), sqlx::Error>
  where
    E: MySqlExecutor<'e>,
  {
    sqlx::query("UPDATE users SET name = ?, password = ?, otp = NULL, otp_expires = NULL WHERE email = ?")
      .bind(name)
      .bind(password_hash)
      .bind(email)
      .execute(executor)
      .await?;

    Ok(())
  }

  pub async fn clear_otp<'e, E>(executor: E, email: &str) -> Result<(), sqlx::Error>
  where
    E: MySqlExecutor<'e>,
  {
    sqlx::query("UPDATE users SET otp = NULL, otp_expires = NULL WHERE email = ?")
      .bind(email)
      .execute(executor)
      .await?;

    Ok(())
  }

  pub async fn create_google_user(
    db: &MySqlPool,
    name: Option<&str>,
    email: &str,
    google_id: &str,
  ) -> Result<User, sqlx::Error> {
    sqlx::query("INSERT INTO users (name, email, google_id) VALUES (?, ?, ?)")
      .bind(name)
      .bind(email)
      .bind(google_id)
      .execute(db)
      .await?;

    Self::find_by_email(db, email).await?.ok_or(sqlx::Error::RowNotFound)
  }
}
