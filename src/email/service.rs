use crate::email::types::{EmailMessage, SmtpConfig};
use anyhow::Result;
use lettre::{
  message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
  Message, Tokio1Executor,
};

pub struct EmailService {
  smtp_config: SmtpConfig,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
  pub fn new(smtp_config: SmtpConfig) -> Result<Self> {
    let creds = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());

    let transporter = if smtp_config.host == "localhost" || smtp_config.host == "mailhog" {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)?
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    };

    Ok(EmailService {
      smtp_config,
      transporter,
    })
  }

  pub async fn send_email(&self, message: &EmailMessage) -> Result<()> {
    for recipient in &message.to {
      let email = Message::builder()
        .from(self.smtp_config.from_email.parse()?)
        .to(recipient.parse()?)
        .subject(&message.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?;

      self.transporter.send(email).await?;
    }

    Ok(())
  }

  pub async fn send_simple_text_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
    let message = EmailMessage::new(vec![to.to_string()], subject.to_string(), body.to_string());
    self.send_email(&message).await
  }

  pub fn build_otp_email_body(otp: &str) -> String {
    format!(
      "Hello,\n\nYour FindMe verification code is: {}\n\nThe code expires in 5 minutes.\n\nIf you did not request it, you can ignore this email.",
      otp
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env;

  #[tokio::test]
  #[ignore]
  async fn test_send_simple_text_email() -> Result<()> {
    dotenvy::dotenv().ok();

    let smtp_config = SmtpConfig {
      host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
      port: env::var("SMTP_PORT")
        .unwrap_or_else(|_| "587".to_string())
        .parse()
        .unwrap(),
      username: env::var("SMTP_USERNAME").expect("SMTP_USERNAME environment variable must be set."),
      password: env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD environment variable must be set."),
      from_email: env::var("SMTP_FROM_EMAIL").expect("SMTP_FROM_EMAIL environment variable must be set."),
    };

    let email_service = EmailService::new(smtp_config)?;

    let result = email_service
      .send_simple_text_email("test@example.com", "Simple Test Subject", "Simple Test Body")
      .await;
    assert!(result.is_ok());

    Ok(())
  }

  #[test]
  fn test_build_otp_email_body() {
    let body = EmailService::build_otp_email_body("123456");
    assert!(body.contains("123456"));
    assert!(body.contains("expires in 5 minutes"));
  }

  #[tokio::test]
  async fn test_email_service_new_with_localhost_smtp() -> Result<()> {
    let smtp_config = SmtpConfig {
      host: "localhost".to_string(),
      port: 1025,
      username: "test_user".to_string(),
      password: "test_password".to_string(),
      from_email: "test@example.com".to_string(),
    };

    let email_service = EmailService::new(smtp_config)?;
    assert_eq!(email_service.smtp_config.host, "localhost");
    assert_eq!(email_service.smtp_config.port, 1025);

    Ok(())
  }

  #[tokio::test]
  async fn test_email_service_new_with_remote_smtp() -> Result<()> {
    let smtp_config = SmtpConfig {
      host: "smtp.example.com".to_string(),
      port: 587,
      username: "test_user".to_string(),
      password: "test_password".to_string(),
      from_email: "test@example.com".to_string(),
    };

    let email_service = EmailService::new(smtp_config)?;
    assert_eq!(email_service.smtp_config.host, "smtp.example.com");
    assert_eq!(email_service.smtp_config.port, 587);

    Ok(())
  }
}
