use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Local-disk store for report photos and temporary query images.
///
/// Only bare filenames are handed out and accepted; anything that looks like a
/// path is rejected so rows in the database can never point outside the store.
#[derive(Clone)]
pub struct ImageStore {
  root: PathBuf,
  temp: PathBuf,
}

impl ImageStore {
  pub fn new(root: impl Into<PathBuf>, temp: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    let temp = temp.into();
    std::fs::create_dir_all(&root).with_context(|| format!("create image dir {}", root.display()))?;
    std::fs::create_dir_all(&temp).with_context(|| format!("create temp dir {}", temp.display()))?;
    Ok(Self { root, temp })
  }

  pub fn from_env() -> Result<Self> {
    let root = env::var("IMAGE_DIR").unwrap_or_else(|_| "data/db_images".to_string());
    let temp = env::var("TEMP_DIR").unwrap_or_else(|_| "data/temp_uploads".to_string());
    Self::new(root, temp)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Strips any directory components and replaces unsafe characters.
  pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
      .chars()
      .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
      .collect();

    if cleaned.trim_matches(['.', '_']).is_empty() {
      "photo.jpg".to_string()
    } else {
      cleaned
    }
  }

  /// Persists an uploaded photo under a unique filename and returns that filename.
  pub async fn save_upload(&self, original_name: &str, data: &[u8]) -> Result<String> {
    let filename = format!("{}_{}", Uuid::new_v4().simple(), Self::sanitize_filename(original_name));
    let path = self.root.join(&filename);
    tokio::fs::write(&path, data)
      .await
      .with_context(|| format!("write upload {}", path.display()))?;
    Ok(filename)
  }

  /// Decodes an image payload and writes it as an RGB JPEG into the temp dir.
  pub async fn save_temp_jpeg(&self, data: &[u8]) -> Result<PathBuf> {
    let img = image::load_from_memory(data).context("decode query image")?;
    let path = self.temp.join(format!("query_{}.jpg", Uuid::new_v4().simple()));
    img
      .to_rgb8()
      .save_with_format(&path, image::ImageFormat::Jpeg)
      .with_context(|| format!("write query image {}", path.display()))?;
    Ok(path)
  }

  /// Resolves a stored filename to its on-disk path, refusing path traversal.
  pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
      return None;
    }
    Some(self.root.join(filename))
  }

  pub async fn write_file(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
    let Some(path) = self.path_for(filename) else {
      bail!("invalid filename: {}", filename);
    };
    tokio::fs::write(&path, data)
      .await
      .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
  }

  /// Removes a stored file. A file that is already gone is not an error.
  pub async fn delete(&self, filename: &str) -> Result<()> {
    let Some(path) = self.path_for(filename) else {
      bail!("invalid filename: {}", filename);
    };
    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
  }
}
