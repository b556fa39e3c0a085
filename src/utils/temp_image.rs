use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::AppError;

/// Uniquely named scratch file holding one request's image.
///
/// The file is deleted when the value is dropped, whichever way the request ends.
#[derive(Debug)]
pub struct TempImage {
    file: NamedTempFile,
}

impl TempImage {
    pub async fn write(bytes: Vec<u8>) -> Result<Self, AppError> {
        let file = actix_web::web::block(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("frame-")
                .suffix(".jpg")
                .tempfile()?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to write temporary image: {}", e)))?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
