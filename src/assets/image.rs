use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Extensions accepted by the file picker (`.jpg, .jpeg, .png`).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// MIME types the pipeline handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
}

impl ImageMime {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The photo attached to the active submission.
#[derive(Clone)]
pub struct ImageAsset {
    /// Where the bytes were read from, if they came from disk.
    pub source: Option<PathBuf>,
    /// Encoded file bytes exactly as selected.
    pub bytes: Arc<Vec<u8>>,
    pub mime: ImageMime,
    /// File name shown to the user and sent as the document name.
    pub name: String,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("source", &self.source)
            .field("bytes_len", &self.bytes.len())
            .field("mime", &self.mime)
            .field("name", &self.name)
            .finish()
    }
}

impl ImageAsset {
    /// Wrap in-memory bytes. The MIME type is derived from `name`'s extension.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SelectionRejected> {
        let name = name.into();
        let mime = ImageMime::from_file_name(&name)
            .ok_or_else(|| SelectionRejected::UnsupportedType(name.clone()))?;
        Ok(Self {
            source: None,
            bytes: Arc::new(bytes),
            mime,
            name,
        })
    }

    /// Read a photo from disk.
    pub fn load(path: &Path) -> Result<Self, SelectionRejected> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| SelectionRejected::Unreadable(path.display().to_string()))?;
        let mime = ImageMime::from_file_name(&name)
            .ok_or_else(|| SelectionRejected::UnsupportedType(name.clone()))?;
        let bytes = std::fs::read(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "photo read failed");
            SelectionRejected::Unreadable(name.clone())
        })?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            bytes: Arc::new(bytes),
            mime,
            name,
        })
    }

    /// `data:<mime>;base64,...` form of the photo.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice())
        )
    }

    /// Natural (intrinsic) pixel size read from the encoded header.
    pub fn natural_size(&self) -> PlaqueResult<(u32, u32)> {
        let dims = image::ImageReader::new(Cursor::new(self.bytes.as_slice()))
            .with_guessed_format()
            .context("sniff photo format")?
            .into_dimensions()
            .map_err(|e| PlaqueError::validation(format!("unreadable photo '{}': {e}", self.name)))?;
        Ok(dims)
    }
}

/// Why a file selection was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionRejected {
    #[error("only one image can be selected (got {0})")]
    MultipleFiles(usize),
    #[error("unsupported file type '{0}' (expected .jpg, .jpeg or .png)")]
    UnsupportedType(String),
    #[error("could not read '{0}'")]
    Unreadable(String),
}

impl From<SelectionRejected> for PlaqueError {
    fn from(value: SelectionRejected) -> Self {
        PlaqueError::validation(value.to_string())
    }
}

/// Result of a file-picker change.
#[derive(Clone, Debug)]
pub enum Selection {
    /// Nothing selected: any pending photo is dropped.
    Cleared,
    Loaded(ImageAsset),
}

/// Apply the single-file picker rules to a list of chosen paths.
pub fn select_files(paths: &[PathBuf]) -> Result<Selection, SelectionRejected> {
    match paths {
        [] => Ok(Selection::Cleared),
        [one] => ImageAsset::load(one).map(Selection::Loaded),
        many => Err(SelectionRejected::MultipleFiles(many.len())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
