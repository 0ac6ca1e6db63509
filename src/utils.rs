use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};
use validator::ValidationError;

pub mod error;
pub mod google;
pub mod jwt;

pub const OTP_LENGTH: usize = 6;

pub fn hash_password(password: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(password.as_bytes());
  let result = hasher.finalize();
  format!("{:x}", result)
}

pub fn generate_otp() -> String {
  let mut rng = rand::thread_rng();
  (0..OTP_LENGTH).map(|_| rng.gen_range(0..10).to_string()).collect()
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
  let letter_regex = Regex::new(r"[a-zA-Z]").unwrap();
  let digit_regex = Regex::new(r"\d").unwrap();

  if !letter_regex.is_match(password) {
    return Err(ValidationError::new("password must contain at least one letter"));
  }

  if !digit_regex.is_match(password) {
    return Err(ValidationError::new("password must contain at least one digit"));
  }

  Ok(())
}

pub async fn init_email_service() -> anyhow::Result<crate::email::EmailService> {
  use crate::email::{EmailService, SmtpConfig};
  use std::env;

  let smtp_config = SmtpConfig {
    host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
    port: env::var("SMTP_PORT")
      .unwrap_or_else(|_| "587".to_string())
      .parse()
      .unwrap_or(587),
    username: env::var("SMTP_USERNAME").expect("SMTP_USERNAME environment variable must be set."),
    password: env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD environment variable must be set."),
    from_email: env::var("SMTP_FROM_EMAIL").expect("SMTP_FROM_EMAIL environment variable must be set."),
  };

  let email_service = EmailService::new(smtp_config)?;
  Ok(email_service)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_generate_otp_shape() {
    for _ in 0..20 {
      let otp = generate_otp();
      assert_eq!(otp.len(), OTP_LENGTH);
      assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }
  }

  #[test]
  fn test_generate_otp_not_constant() {
    let otps: std::collections::HashSet<String> = (0..50).map(|_| generate_otp()).collect();
    assert!(otps.len() > 1);
  }

  #[test]
  fn test_hash_password_is_hex_sha256() {
    let hash = hash_password("password123");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash, hash_password("password123"));
    assert_ne!(hash, hash_password("password124"));
  }

  #[test]
  fn test_validate_password_valid() {
    assert!(validate_password("password123").is_ok());
    assert!(validate_password("Test123").is_ok());
    assert!(validate_password("A1").is_ok());
  }

  #[test]
  fn test_validate_password_missing_letter() {
    let result = validate_password("12345678");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(format!("{:?}", err).contains("password must contain at least one letter"));
  }

  #[test]
  fn test_validate_password_missing_digit() {
    let result = validate_password("abcdefghijk");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(format!("{:?}", err).contains("password must contain at least one digit"));
  }

  #[test]
  fn test_validate_password_empty() {
    assert!(validate_password("").is_err());
  }
}
