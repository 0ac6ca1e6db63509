use anyhow::{Context, Result};
use image::Luma;
use qrcode::QrCode;

/// Renders a URL as a PNG-encoded QR code.
pub fn qr_png_bytes(url: &str) -> Result<Vec<u8>> {
  let code = QrCode::new(url.as_bytes()).context("encode QR symbol")?;
  let img = code.render::<Luma<u8>>().min_dimensions(320, 320).build();

  let mut bytes = Vec::new();
  image::DynamicImage::ImageLuma8(img)
    .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
    .context("encode QR PNG")?;

  Ok(bytes)
}
