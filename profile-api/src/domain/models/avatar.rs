use crate::domain::AvatarError;

use super::UserId;

/// Multipart field name the upload pipeline reads the avatar from.
pub const AVATAR_FIELD_NAME: &str = "avatar";

/// Image types accepted for avatars, keyed by their declared media type.
/// `image/jpg` and `image/jpeg` stay distinct so the stored extension follows
/// the declared subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpg,
    Jpeg,
}

impl ImageKind {
    pub fn from_mime(mime_type: &str) -> Result<Self, AvatarError> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpg" => Ok(Self::Jpg),
            "image/jpeg" => Ok(Self::Jpeg),
            _ => Err(AvatarError::UnsupportedMediaType),
        }
    }

    /// The media subtype, used as the stored file's extension.
    pub fn subtype(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }

    /// Whether the sniffed content format agrees with the declared type.
    pub fn matches(&self, format: image::ImageFormat) -> bool {
        match self {
            Self::Png => format == image::ImageFormat::Png,
            Self::Jpg | Self::Jpeg => format == image::ImageFormat::Jpeg,
        }
    }
}

/// A single file received by the upload pipeline, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub field_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(
        field_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            content_type,
            bytes,
        }
    }

    /// Deterministic stored name: `<fieldname>-<userId>.<subtype>`.
    pub fn file_name(&self, user_id: &UserId, kind: ImageKind) -> String {
        format!("{}-{}.{}", self.field_name, user_id, kind.subtype())
    }
}

/// Where an accepted avatar ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAvatar {
    pub file_name: String,
    pub public_url: String,
}
