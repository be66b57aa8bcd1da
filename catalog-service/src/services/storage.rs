use async_trait::async_trait;
use service_core::error::AppError;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a new object. Returns `false`, leaving the existing object
    /// untouched, when `key` is already taken.
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<bool, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !fs::try_exists(&base_path).await? {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<bool, AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // create_new fails atomically if the file exists
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.base_path.join(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
