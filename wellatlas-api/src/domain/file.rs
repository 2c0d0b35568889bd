use std::path::Path;

use serde::Serialize;
use sqlx::FromRow;
use strum::{Display, EnumString};

/// Coarse attachment kind, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Pdf,
    Image,
    Video,
    Other,
}

impl FileType {
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("jpg" | "jpeg" | "png" | "gif" | "webp" | "heic") => Self::Image,
            Some("mp4" | "mov" | "avi" | "webm") => Self::Video,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JobFile {
    pub id: i64,
    pub job_id: i64,
    pub filename: String,
    pub file_type: String,
    pub url: String,
    pub uploaded_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_type_from_extension() {
        assert_eq!(FileType::from_filename("permit.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_filename("casing.jpeg"), FileType::Image);
        assert_eq!(FileType::from_filename("site photo.HEIC"), FileType::Image);
        assert_eq!(FileType::from_filename("pump-test.mov"), FileType::Video);
        assert_eq!(FileType::from_filename("flush.WEBM"), FileType::Video);
        assert_eq!(FileType::from_filename("clip.m4v"), FileType::Other);
        assert_eq!(FileType::from_filename("log.txt"), FileType::Other);
        assert_eq!(FileType::from_filename("README"), FileType::Other);
    }

    #[test]
    fn stores_as_lowercase_name() {
        assert_eq!(FileType::Image.to_string(), "image");
        assert_eq!("video".parse::<FileType>().unwrap(), FileType::Video);
    }
}
