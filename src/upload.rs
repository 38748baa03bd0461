use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::error::ValidationError;

/// 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const MIN_CONFIDENCE: f32 = 0.1;
pub const MAX_CONFIDENCE: f32 = 1.0;
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file the user offered through the picker, a window drop or the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Reads a candidate from disk. The MIME type comes from the extension,
    /// falling back to sniffing the content. Files over the upload limit are
    /// not read into memory; they only carry their size.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ValidationError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let size = metadata.len();

        if size > MAX_UPLOAD_BYTES {
            let mime_type = ImageFormat::from_path(path)
                .map(|f| f.to_mime_type().to_string())
                .unwrap_or_else(|_| FALLBACK_MIME.to_string());
            return Ok(Self {
                name,
                mime_type,
                size,
                bytes: Vec::new(),
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ValidationError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let mime_type = ImageFormat::from_path(path)
            .or_else(|_| image::guess_format(&bytes))
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| FALLBACK_MIME.to_string());
        Ok(Self {
            name,
            mime_type,
            size,
            bytes,
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// A validated candidate, ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSelection {
    pub file: FileCandidate,
    /// Always within `[MIN_CONFIDENCE, MAX_CONFIDENCE]`
    pub confidence_threshold: f32,
}

/// Owned copy of a selection captured by one in-flight submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub confidence_threshold: f32,
}

impl UploadRequest {
    /// Form field value for `confidence_threshold`.
    pub fn threshold_field(&self) -> String {
        format!("{:.2}", self.confidence_threshold)
    }
}

pub fn validate(candidate: &FileCandidate) -> Result<(), ValidationError> {
    if !candidate.mime_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            mime_type: candidate.mime_type.clone(),
        });
    }
    if candidate.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: candidate.size,
        });
    }
    Ok(())
}

/// Clamps to `[MIN_CONFIDENCE, MAX_CONFIDENCE]` at 0.01 resolution. `None` for NaN.
pub fn clamp_confidence(value: f32) -> Option<f32> {
    if value.is_nan() {
        return None;
    }
    let clamped = value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    Some(((clamped * 100.0).round() / 100.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE))
}

/// Selection, threshold and the error shown next to the upload control.
#[derive(Debug, Clone)]
pub struct UploadController {
    selection: Option<UploadSelection>,
    confidence_threshold: f32,
    error: Option<String>,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE)
    }
}

impl UploadController {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            selection: None,
            confidence_threshold: clamp_confidence(confidence_threshold)
                .unwrap_or(DEFAULT_CONFIDENCE),
            error: None,
        }
    }

    pub fn selection(&self) -> Option<&UploadSelection> {
        self.selection.as_ref()
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the selection when the candidate is valid. A rejected
    /// candidate leaves the current selection in place.
    pub fn select_file(
        &mut self,
        candidate: FileCandidate,
    ) -> Result<&UploadSelection, ValidationError> {
        if let Err(err) = validate(&candidate) {
            debug!(name = %candidate.name, %err, "rejected upload candidate");
            self.error = Some(err.to_string());
            return Err(err);
        }
        debug!(name = %candidate.name, size = candidate.size, "selected upload candidate");
        self.error = None;
        Ok(&*self.selection.insert(UploadSelection {
            file: candidate,
            confidence_threshold: self.confidence_threshold,
        }))
    }

    /// Records an error raised before a candidate could be validated.
    pub fn reject(&mut self, error: ValidationError) {
        self.error = Some(error.to_string());
    }

    pub fn clear_file(&mut self) {
        self.selection = None;
        self.error = None;
    }

    /// Returns the threshold that will be sent with the next submission.
    pub fn set_confidence_threshold(&mut self, value: f32) -> f32 {
        if let Some(clamped) = clamp_confidence(value) {
            self.confidence_threshold = clamped;
            if let Some(selection) = &mut self.selection {
                selection.confidence_threshold = clamped;
            }
        }
        self.confidence_threshold
    }

    pub fn prepare_submission(&mut self) -> Result<UploadRequest, ValidationError> {
        let Some(selection) = &self.selection else {
            let err = ValidationError::NoSelection;
            self.error = Some(err.to_string());
            return Err(err);
        };
        self.error = None;
        Ok(UploadRequest {
            file_name: selection.file.name.clone(),
            mime_type: selection.file.mime_type.clone(),
            bytes: selection.file.bytes.clone(),
            confidence_threshold: selection.confidence_threshold,
        })
    }

    /// Shows a failed submission's message next to the form.
    pub fn report_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
