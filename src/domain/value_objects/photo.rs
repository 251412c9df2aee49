use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest photo the story service accepts: 1 MiB.
pub const MAX_PHOTO_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoMime {
    Jpeg,
    Png,
    Gif,
}

impl PhotoMime {
    pub fn from_mime_str(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(PhotoMime::Jpeg),
            "image/png" => Ok(PhotoMime::Png),
            "image/gif" => Ok(PhotoMime::Gif),
            other => Err(format!(
                "Unsupported photo type '{other}'. Use JPEG, PNG, or GIF"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoMime::Jpeg => "image/jpeg",
            PhotoMime::Png => "image/png",
            PhotoMime::Gif => "image/gif",
        }
    }

    /// Default file name used when a queued photo carries none.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            PhotoMime::Jpeg => "photo.jpg",
            PhotoMime::Png => "photo.png",
            PhotoMime::Gif => "photo.gif",
        }
    }
}

impl fmt::Display for PhotoMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated story photo. Construction is the only validation point:
/// a `Photo` value is always within the size limit and of an accepted type.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    mime: PhotoMime,
    bytes: Bytes,
    file_name: Option<String>,
}

impl Photo {
    pub fn new(mime: PhotoMime, bytes: Bytes, file_name: Option<String>) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("Photo must not be empty".to_string());
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err("Photo size must not exceed 1MB".to_string());
        }
        Ok(Self {
            mime,
            bytes,
            file_name: file_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        })
    }

    pub fn from_mime_str(
        mime: &str,
        bytes: Bytes,
        file_name: Option<String>,
    ) -> Result<Self, String> {
        Self::new(PhotoMime::from_mime_str(mime)?, bytes, file_name)
    }

    pub fn mime(&self) -> PhotoMime {
        self.mime
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .unwrap_or_else(|| self.mime.default_file_name())
    }
}
