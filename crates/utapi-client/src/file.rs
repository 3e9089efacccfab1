//! Local file inspection

use crate::{sniff, ClientError, FileRequest, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

impl FileRequest {
    /// Describe a local file for `/prepareUpload`.
    ///
    /// The name is the path's base name, the size comes from filesystem
    /// metadata and the type is sniffed from the first 512 bytes.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ClientError::file_access(path, e))?;

        let mut head = Vec::with_capacity(sniff::SNIFF_LEN);
        (&mut file)
            .take(sniff::SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .await
            .map_err(|e| ClientError::file_access(path, e))?;

        let size = file
            .metadata()
            .await
            .map_err(|e| ClientError::file_access(path, e))?
            .len();

        let request = Self {
            name: base_name(path),
            size,
            file_type: sniff::detect_content_type(&head).to_string(),
        };
        debug!(name = %request.name, size, file_type = %request.file_type, "Inspected local file");

        Ok(request)
    }
}

pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_path_pdf() {
        let content = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n";
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(content).unwrap();

        let request = FileRequest::from_path(file.path()).await.unwrap();

        // content wins over the extension
        assert_eq!(request.file_type, "application/pdf");
        assert_eq!(request.size, content.len() as u64);
        assert!(request.name.ends_with(".bin"));
        assert!(!request.name.contains('/'));
    }

    #[tokio::test]
    async fn test_size_matches_large_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data = vec![b'x'; 70_000];
        file.write_all(&data).unwrap();

        let request = FileRequest::from_path(file.path()).await.unwrap();
        assert_eq!(request.size, 70_000);
        assert_eq!(request.file_type, "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = FileRequest::from_path("/definitely/not/here.pdf").await;
        assert!(matches!(result, Err(ClientError::FileAccess { .. })));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/tmp/docs/abc.pdf")), "abc.pdf");
        assert_eq!(base_name(Path::new("abc.pdf")), "abc.pdf");
    }
}
