use anyhow::{Context, Result};
use printpdf::image_crate::{self, GenericImageView};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};

use crate::domains::report::model::Report;

const LETTER: (f32, f32) = (215.9, 279.4);
const A4: (f32, f32) = (210.0, 297.0);
const EMBED_DPI: f32 = 300.0;

fn unknown() -> String {
  "Unknown".to_string()
}

fn detail_lines(report: &Report) -> Vec<(&'static str, String)> {
  vec![
    ("Name", report.name.clone()),
    ("Age", report.age.map(|a| a.to_string()).unwrap_or_else(unknown)),
    ("Gender", report.gender.clone().unwrap_or_else(unknown)),
    ("Phone", report.phone.clone().unwrap_or_else(|| "Not Available".to_string())),
    ("Last seen", report.last_seen_date.map(|d| d.to_string()).unwrap_or_else(unknown)),
    ("Location", report.location.clone().unwrap_or_else(unknown)),
    ("Description", report.description.clone().unwrap_or_default()),
    ("Status", report.status.clone()),
  ]
}

/// Letter-size, text-only summary of a report.
pub fn summary_pdf(report: &Report) -> Result<Vec<u8>> {
  let (doc, page, layer) = PdfDocument::new("Missing Person Report", Mm(LETTER.0), Mm(LETTER.1), "Layer 1");
  let layer = doc.get_page(page).get_layer(layer);

  let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
  let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;

  layer.use_text("Missing Person Report", 20.0, Mm(18.0), Mm(255.0), &bold);

  let mut y = 240.0;
  for (label, value) in detail_lines(report) {
    layer.use_text(format!("{}: {}", label, value), 12.0, Mm(18.0), Mm(y), &regular);
    y -= 7.0;
  }

  doc.save_to_bytes().context("render summary PDF")
}

/// A4 poster: headline, photo, details and a QR code linking to the report.
pub fn poster_pdf(report: &Report, photo: &[u8], qr_png: &[u8]) -> Result<Vec<u8>> {
  let (doc, page, layer) = PdfDocument::new("FindMe Missing Person Alert", Mm(A4.0), Mm(A4.1), "Layer 1");
  let layer = doc.get_page(page).get_layer(layer);

  let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
  let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;

  layer.use_text("FINDME - Missing Person Alert", 28.0, Mm(22.0), Mm(276.0), &bold);

  let photo = image_crate::load_from_memory(photo).context("decode report photo")?;
  embed_image(&layer, &photo, Mm(60.0), Mm(175.0), 90.0);

  let mut y = 160.0;
  for (label, value) in detail_lines(report) {
    let font = if y > 130.0 { &bold } else { &regular };
    layer.use_text(format!("{}: {}", label, value), 14.0, Mm(20.0), Mm(y), font);
    y -= 9.0;
  }

  layer.use_text("Scan QR to open report online:", 13.0, Mm(20.0), Mm(76.0), &bold);
  let qr = image_crate::load_from_memory(qr_png).context("decode QR code")?;
  embed_image(&layer, &qr, Mm(20.0), Mm(24.0), 45.0);

  doc.save_to_bytes().context("render poster PDF")
}

fn embed_image(layer: &PdfLayerReference, img: &image_crate::DynamicImage, x: Mm, y: Mm, width_mm: f32) {
  let (width_px, _) = img.dimensions();
  let natural_width_mm = width_px as f32 * 25.4 / EMBED_DPI;
  let scale = width_mm / natural_width_mm;

  Image::from_dynamic_image(img).add_to_layer(
    layer.clone(),
    ImageTransform {
      translate_x: Some(x),
      translate_y: Some(y),
      scale_x: Some(scale),
      scale_y: Some(scale),
      dpi: Some(EMBED_DPI),
      ..Default::default()
    },
  );
}
