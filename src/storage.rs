//! Local image storage rooted at the static-files directory.
//!
//! Files land under `uploads/` and are addressed by web-relative URLs
//! (`/uploads/...`) that the router serves straight from disk.

use bytes::Bytes;
use chrono::{Datelike, Utc};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

pub const UPLOADS_DIR: &str = "uploads";

/// A file received from a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A file written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Web-relative URL, always starting with `/uploads/`
    pub url: String,
    pub path: PathBuf,
    /// Original client-side file name
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes to `uploads/categories/{year}/{month}/{uuid}{ext}`.
    pub async fn save_category_image(&self, upload: &Upload) -> Result<StoredFile, ServiceError> {
        let now = Utc::now();
        let folder = format!(
            "{}/categories/{}/{:02}",
            UPLOADS_DIR,
            now.year(),
            now.month()
        );
        self.write(&folder, upload).await
    }

    /// Writes to `uploads/products/{school}/{product}/{uuid}{ext}`.
    pub async fn save_product_image(
        &self,
        school_id: i32,
        product_id: i32,
        upload: &Upload,
    ) -> Result<StoredFile, ServiceError> {
        self.write(&product_folder(school_id, product_id), upload)
            .await
    }

    async fn write(&self, folder: &str, upload: &Upload) -> Result<StoredFile, ServiceError> {
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir).await?;

        let name = format!("{}{}", Uuid::new_v4().simple(), extension_of(&upload.file_name));
        let path = dir.join(&name);
        fs::write(&path, &upload.bytes).await?;
        debug!(path = %path.display(), bytes = upload.bytes.len(), "stored upload");

        Ok(StoredFile {
            url: format!("/{}/{}", folder, name),
            path,
            file_name: upload.file_name.clone(),
        })
    }

    /// Maps a `/uploads/...` URL back to its on-disk path. URLs that would
    /// escape the uploads directory resolve to `None`.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.trim_start_matches('/'));
        let mut components = relative.components();
        match components.next() {
            Some(Component::Normal(first)) if first == UPLOADS_DIR => {}
            _ => return None,
        }
        if components.any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(relative))
    }

    /// Best-effort delete of the file behind `url`. Returns whether a file was removed.
    pub async fn remove_url(&self, url: &str) -> bool {
        let Some(path) = self.path_for_url(url) else {
            warn!(url, "refusing to remove file outside uploads");
            return false;
        };
        match fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove stored file");
                false
            }
        }
    }

    /// Best-effort removal of files written earlier in a failed operation.
    pub async fn discard(&self, files: &[StoredFile]) {
        for file in files {
            if let Err(e) = fs::remove_file(&file.path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %file.path.display(), error = %e, "failed to discard upload");
                }
            }
        }
    }

    /// Removes a product's whole image folder; a missing folder is not an error.
    pub async fn remove_product_folder(
        &self,
        school_id: i32,
        product_id: i32,
    ) -> Result<(), ServiceError> {
        let dir = self.root.join(product_folder(school_id, product_id));
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn product_folder(school_id: i32, product_id: i32) -> String {
    format!("{}/products/{}/{}", UPLOADS_DIR, school_id, product_id)
}

/// Lower-cased `.ext` of a client file name, or empty when it has none
/// usable. Only short alphanumeric extensions are kept.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
