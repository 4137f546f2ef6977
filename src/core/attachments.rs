//! Attachment validation for outgoing messages
//!
//! Files picked by the user arrive as [`RawFile`] descriptors. Only documents
//! the backend can read are kept: a file passes if its declared MIME type is on
//! the allow-list, or, failing that, if its name ends with an allowed
//! extension. Some platforms report an empty or generic MIME type for
//! markdown and office files, so both checks are kept independently.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// MIME types accepted as attachments
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "text/html",
    "text/markdown",
    "text/plain",
];

/// Filename suffixes accepted when the MIME type is missing or wrong
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".doc", ".html", ".htm", ".md", ".txt"];

/// Errors building a [`RawFile`] from the filesystem
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unvalidated file descriptor as handed over by a file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub size: u64,
    /// Declared MIME type; empty when the picker did not report one
    pub mime_type: String,
    pub handle: PathBuf,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        handle: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            handle: handle.into(),
        }
    }

    /// Describe a file on disk, guessing its MIME type from the extension
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        if !path.exists() {
            return Err(AttachmentError::FileNotFound(path.display().to_string()));
        }
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile(path.display().to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type,
            handle: path.to_path_buf(),
        })
    }
}

/// An attachment that passed validation
///
/// The id is local and independent of the filename, so two files with the
/// same name can both be attached and removed individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub handle: PathBuf,
}

impl AttachedFile {
    /// Display line for attachment lists: name and human-readable size
    pub fn preview(&self) -> String {
        format!("{} ({})", self.name, format_size(self.size))
    }
}

/// Allow-list filter for picked files
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentValidator;

impl AttachmentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Keep the acceptable files, in input order, each with a fresh id
    ///
    /// Rejected files are dropped without an error.
    pub fn validate(&self, raw_files: impl IntoIterator<Item = RawFile>) -> Vec<AttachedFile> {
        raw_files
            .into_iter()
            .filter_map(|raw| {
                if is_allowed_mime(&raw.mime_type) || has_allowed_extension(&raw.name) {
                    Some(AttachedFile {
                        id: Uuid::new_v4(),
                        name: raw.name,
                        size: raw.size,
                        mime_type: raw.mime_type,
                        handle: raw.handle,
                    })
                } else {
                    tracing::debug!(
                        "Attachment rejected - unsupported format: {} ({:?})",
                        raw.name,
                        raw.mime_type
                    );
                    None
                }
            })
            .collect()
    }
}

/// Whether a declared MIME type is on the allow-list (parameters ignored)
pub fn is_allowed_mime(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    !essence.is_empty() && ALLOWED_MIME_TYPES.contains(&essence.as_str())
}

/// Whether a filename ends with an allowed extension (case-insensitive)
pub fn has_allowed_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Format a size in bytes for display, 1024-based, up to two decimals
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
