use super::storage::Storage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use service_core::error::AppError;
use service_core::outcome::Notifier;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub const IMAGE_REQUIRED: &str = "an image must be supplied for this product";
pub const IMAGE_EXISTS: &str = "a file with this name already exists";
pub const IMAGE_NOT_BASE64: &str = "the image upload is not valid base64";

/// Image bytes as received, before decoding.
#[derive(Debug, Clone)]
pub enum ImageUpload {
    Base64(String),
    Raw(Vec<u8>),
}

/// Product image persistence over a [`Storage`] backend.
///
/// Upload problems are business failures: they are pushed into the request
/// notifier and reported as `Ok(false)`. Only I/O faults are errors.
#[derive(Clone)]
pub struct ImageStore {
    storage: Arc<dyn Storage>,
}

impl ImageStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// `<uuid>_<file name>`; any directory part of `original` is dropped.
    pub fn stored_name(original: &str) -> String {
        let file_name = Path::new(original)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("image");
        format!("{}_{}", Uuid::new_v4(), file_name)
    }

    /// Decode `upload`, notifying when it is missing, empty or not base64.
    pub fn decode(notifier: &mut Notifier, upload: Option<ImageUpload>) -> Option<Vec<u8>> {
        let data = match upload {
            Some(ImageUpload::Base64(encoded)) if !encoded.trim().is_empty() => {
                match STANDARD.decode(encoded.trim()) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::info!(error = %e, "Rejected image upload that is not base64");
                        notifier.notify(IMAGE_NOT_BASE64);
                        return None;
                    }
                }
            }
            Some(ImageUpload::Raw(bytes)) => bytes,
            _ => Vec::new(),
        };

        if data.is_empty() {
            notifier.notify(IMAGE_REQUIRED);
            return None;
        }
        Some(data)
    }

    /// Store `data` under `name`. An existing file is never replaced: the
    /// conflict is notified and `Ok(false)` returned.
    pub async fn write(
        &self,
        notifier: &mut Notifier,
        name: &str,
        data: Vec<u8>,
    ) -> Result<bool, AppError> {
        if !self.storage.upload(name, data).await? {
            tracing::warn!(image = %name, "Refused to overwrite existing image");
            notifier.notify(IMAGE_EXISTS);
            return Ok(false);
        }
        tracing::info!(image = %name, "Stored product image");
        Ok(true)
    }

    pub async fn discard(&self, name: &str) -> Result<(), AppError> {
        self.storage.delete(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::LocalStorage;
    use std::path::PathBuf;

    async fn store() -> (ImageStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("catalog-images-{}", Uuid::new_v4()));
        let storage = LocalStorage::new(&dir).await.unwrap();
        (ImageStore::new(Arc::new(storage)), dir)
    }

    #[test]
    fn stored_name_is_prefixed_and_stripped_of_directories() {
        let name = ImageStore::stored_name("../../etc/widget.png");
        assert!(name.ends_with("_widget.png"));
        assert_eq!(name.len(), 36 + 1 + "widget.png".len());
    }

    #[test]
    fn base64_upload_is_decoded() {
        let mut notifier = Notifier::new();

        let data = ImageStore::decode(
            &mut notifier,
            Some(ImageUpload::Base64(STANDARD.encode(b"png"))),
        );

        assert_eq!(data, Some(b"png".to_vec()));
        assert!(!notifier.has_notifications());
    }

    #[test]
    fn missing_image_is_a_notification() {
        let mut notifier = Notifier::new();

        assert!(ImageStore::decode(&mut notifier, None).is_none());
        assert!(ImageStore::decode(&mut notifier, Some(ImageUpload::Raw(Vec::new()))).is_none());
        assert!(ImageStore::decode(&mut notifier, Some(ImageUpload::Base64("  ".into()))).is_none());

        assert_eq!(
            notifier.messages(),
            vec![IMAGE_REQUIRED, IMAGE_REQUIRED, IMAGE_REQUIRED]
        );
    }

    #[test]
    fn invalid_base64_is_a_notification() {
        let mut notifier = Notifier::new();

        let data = ImageStore::decode(&mut notifier, Some(ImageUpload::Base64("***".into())));

        assert!(data.is_none());
        assert_eq!(notifier.messages(), vec![IMAGE_NOT_BASE64]);
    }

    #[tokio::test]
    async fn existing_name_is_never_overwritten() {
        let (images, dir) = store().await;
        let mut notifier = Notifier::new();
        assert!(images
            .write(&mut notifier, "a.png", b"first".to_vec())
            .await
            .unwrap());

        let written = images
            .write(&mut notifier, "a.png", b"second".to_vec())
            .await
            .unwrap();

        assert!(!written);
        assert_eq!(notifier.messages(), vec![IMAGE_EXISTS]);
        assert_eq!(tokio::fs::read(dir.join("a.png")).await.unwrap(), b"first");
        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn discard_removes_the_file() {
        let (images, dir) = store().await;
        let mut notifier = Notifier::new();
        images
            .write(&mut notifier, "a.png", b"png".to_vec())
            .await
            .unwrap();

        images.discard("a.png").await.unwrap();

        assert!(!tokio::fs::try_exists(dir.join("a.png")).await.unwrap());
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
