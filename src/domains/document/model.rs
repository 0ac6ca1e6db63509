use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QrResponse {
  pub qr_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportUrlResponse {
  pub url: String,
}

/// A rendered PDF ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct PdfFile {
  pub filename: String,
  pub bytes: Vec<u8>,
}
