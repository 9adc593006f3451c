//! Multipart upload intake: MIME gate and size limits.

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::state::UploadLimits;

/// Repeated file field carrying the PDFs.
pub const FILE_FIELD: &str = "pdfs";
/// Text field carrying the 1-based target page.
pub const PAGE_FIELD: &str = "removePage";

/// One accepted PDF upload, held in memory for the request's lifetime.
pub struct Upload {
    pub original_name: String,
    pub content: Vec<u8>,
}

/// Everything drained from the multipart body before processing starts.
pub struct Intake {
    pub uploads: Vec<Upload>,
    pub remove_page: Option<String>,
}

impl Intake {
    /// Parse the 1-based target page; missing, non-numeric, or below 1
    /// is a validation error.
    pub fn target_page(&self) -> Result<u32, ApiError> {
        let raw = self.remove_page.as_deref().unwrap_or("").trim();
        match raw.parse::<u32>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(ApiError::InvalidPageNumber),
        }
    }
}

/// Drain the multipart body, accepting file parts that declare
/// `application/pdf` and fit the limits. Any rejected part fails the
/// whole request; there is no partial acceptance of a batch.
pub async fn collect(mut multipart: Multipart, limits: &UploadLimits) -> Result<Intake, ApiError> {
    let mut uploads: Vec<Upload> = Vec::new();
    let mut remove_page = None;
    let mut total_bytes: usize = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadMultipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            FILE_FIELD => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload.pdf".to_string());

                let declared = field.content_type().unwrap_or("").to_string();
                if declared != "application/pdf" {
                    return Err(ApiError::UnsupportedMediaType(declared));
                }

                if uploads.len() >= limits.max_files {
                    return Err(ApiError::TooManyFiles(limits.max_files));
                }

                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadMultipart(e.to_string()))?;

                if content.len() > limits.max_file_bytes {
                    return Err(ApiError::FileTooLarge(original_name));
                }

                total_bytes += content.len();
                if total_bytes > limits.max_total_bytes {
                    return Err(ApiError::PayloadTooLarge);
                }

                uploads.push(Upload {
                    original_name,
                    content: content.to_vec(),
                });
            }
            PAGE_FIELD => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadMultipart(e.to_string()))?;
                remove_page = Some(value);
            }
            // Unknown fields are drained and ignored
            _ => {}
        }
    }

    Ok(Intake {
        uploads,
        remove_page,
    })
}
