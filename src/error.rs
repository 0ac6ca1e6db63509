/// Macro to generate common From implementations for service errors
///
/// Usage:
/// ```ignore
/// impl_service_error_conversions!(ReportServiceError, InternalServerError);
/// ```
#[macro_export]
macro_rules! impl_service_error_conversions {
  ($error_type:ty, $internal_variant:ident) => {
    impl From<sqlx::Error> for $error_type {
      fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        <$error_type>::$internal_variant("Database error".to_string())
      }
    }
  };
}
