use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use super::model::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
  async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
  async fn create_placeholder(&self, email: &str) -> Result<User, sqlx::Error>;
  async fn set_otp(&self, email: &str, otp: &str, expires_at: DateTime<Utc>) -> Result<(), sqlx::Error>;
  async fn complete_registration(&self, email: &str, name: &str, password_hash: &str) -> Result<(), sqlx::Error>;
  async fn clear_otp(&self, email: &str) -> Result<(), sqlx::Error>;
  async fn create_google_user(&self, name: Option<&str>, email: &str, google_id: &str)
    -> Result<User, sqlx::Error>;
}

pub struct SqlxUserRepository {
  pub pool: MySqlPool,
}

impl SqlxUserRepository {
  pub fn new(pool: MySqlPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
    User::find_by_email(&self.pool, email).await
  }

  async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
    User::find_by_id(&self.pool, id).await
  }

  async fn create_placeholder(&self, email: &str) -> Result<User, sqlx::Error> {
    User::create_placeholder(&self.pool, email).await
  }

  async fn set_otp(&self, email: &str, otp: &str, expires_at: DateTime<Utc>) -> Result<(), sqlx::Error> {
    User::set_otp(&self.pool, email, otp, expires_at).await
  }

  async fn complete_registration(&self, email: &str, name: &str, password_hash: &str) -> Result<(), sqlx::Error> {
    User::complete_registration(&self.pool, email, name, password_hash).await
  }

  async fn clear_otp(&self, email: &str) -> Result<(), sqlx::Error> {
    User::clear_otp(&self.pool, email).await
  }

  async fn create_google_user(
    &self,
    name: Option<&str>,
    email: &str,
    google_id: &str,
  ) -> Result<User, sqlx::Error> {
    User::create_google_user(&self.pool, name, email, google_id).await
  }
}
