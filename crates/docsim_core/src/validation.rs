use thiserror::Error;

use crate::FileRef;

pub const DEFAULT_MAX_BYTES: u64 = 16 * 1024 * 1024;

pub const MEDIA_PDF: &str = "application/pdf";
pub const MEDIA_TEXT: &str = "text/plain";
pub const MEDIA_MSWORD: &str = "application/msword";
pub const MEDIA_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported media type {media_type}")]
    UnsupportedMediaType { media_type: String },
    #[error("file too large (max {max_bytes}, actual {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },
}

/// Accept/reject rule applied to every incoming file. Only metadata is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub allowed_media_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allowed_media_types: vec![
                MEDIA_PDF.to_string(),
                MEDIA_TEXT.to_string(),
                MEDIA_MSWORD.to_string(),
                MEDIA_DOCX.to_string(),
            ],
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// A validated batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Intake {
    pub accepted: Vec<FileRef>,
    pub rejected: Vec<(FileRef, ValidationError)>,
}

impl ValidationPolicy {
    pub fn check(&self, file: &FileRef) -> Result<(), ValidationError> {
        if !self.is_media_type_allowed(&file.media_type) {
            return Err(ValidationError::UnsupportedMediaType {
                media_type: file.media_type.clone(),
            });
        }
        if file.size_bytes > self.max_bytes {
            return Err(ValidationError::TooLarge {
                max_bytes: self.max_bytes,
                actual: file.size_bytes,
            });
        }
        Ok(())
    }

    pub fn partition(&self, files: Vec<FileRef>) -> Intake {
        let mut intake = Intake::default();
        for file in files {
            match self.check(&file) {
                Ok(()) => intake.accepted.push(file),
                Err(err) => intake.rejected.push((file, err)),
            }
        }
        intake
    }

    fn is_media_type_allowed(&self, media_type: &str) -> bool {
        let essence = media_type.split(';').next().unwrap_or(media_type).trim();
        self.allowed_media_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}
