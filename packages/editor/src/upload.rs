//! Image upload gate: size/type validation in front of whatever backend
//! the host wires in.

/// Uploads over 5 MiB are refused before touching the backend
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// URL to use as the image src
    Accepted { url: String },
    Refused { reason: String },
}

impl UploadOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadOutcome::Accepted { url } => Some(url),
            UploadOutcome::Refused { .. } => None,
        }
    }
}

/// Backend that turns validated bytes into a servable URL
pub trait UploadService {
    fn upload(&mut self, file_name: &str, bytes: &[u8]) -> UploadOutcome;
}

/// Validate and forward a file to the backend
pub fn upload_image(
    service: &mut dyn UploadService,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> UploadOutcome {
    if !ACCEPTED_TYPES.contains(&content_type) {
        return UploadOutcome::Refused {
            reason: format!("unsupported file type: {content_type}"),
        };
    }
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return UploadOutcome::Refused {
            reason: format!(
                "file is {} bytes, limit is {} bytes",
                bytes.len(),
                MAX_FILE_SIZE
            ),
        };
    }
    service.upload(file_name, bytes)
}

/// Test double that serves every upload from a fake CDN path
#[derive(Debug, Default)]
pub struct MockUpload {
    pub uploads: Vec<String>,
}

impl UploadService for MockUpload {
    fn upload(&mut self, file_name: &str, _bytes: &[u8]) -> UploadOutcome {
        self.uploads.push(file_name.to_string());
        UploadOutcome::Accepted {
            url: format!("https://cdn.example/{file_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_small_png() {
        let mut service = MockUpload::default();
        let outcome = upload_image(&mut service, "cat.png", "image/png", &[0u8; 1024]);
        assert_eq!(outcome.url(), Some("https://cdn.example/cat.png"));
        assert_eq!(service.uploads, vec!["cat.png"]);
    }

    #[test]
    fn test_refuses_oversized_file() {
        let mut service = MockUpload::default();
        let bytes = vec![0u8; (MAX_FILE_SIZE + 1) as usize];
        let outcome = upload_image(&mut service, "big.png", "image/png", &bytes);
        assert!(matches!(outcome, UploadOutcome::Refused { .. }));
        // Backend never sees the refused file
        assert!(service.uploads.is_empty());
    }

    #[test]
    fn test_refuses_non_image_type() {
        let mut service = MockUpload::default();
        let outcome = upload_image(&mut service, "doc.pdf", "application/pdf", &[0u8; 10]);
        assert!(matches!(outcome, UploadOutcome::Refused { .. }));
    }
}
