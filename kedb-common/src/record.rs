//! KEDB record model
//!
//! A record is built from one form submission, handed to the document
//! assembler once, then dropped. Only the generated file is kept.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use image::{GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::{Error, KedbNumber, Result};

/// Version written when the form leaves it blank
pub const DEFAULT_VERSION: &str = "1.0";

/// Classification of the known error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    System,
    Data,
    Configuration,
    Other,
}

impl IssueType {
    /// All issue types in form order
    pub const ALL: [IssueType; 4] = [
        IssueType::System,
        IssueType::Data,
        IssueType::Configuration,
        IssueType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::System => "System",
            IssueType::Data => "Data",
            IssueType::Configuration => "Configuration",
            IssueType::Other => "Other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown issue type: {}", trimmed)))
    }
}

/// Uploaded snapshot attached to the root cause or fix section
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Pixel dimensions, read during validation
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageAttachment {
    /// Validate an upload and capture its dimensions
    ///
    /// Only PNG and JPEG files are accepted, both by extension and by content.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !matches!(extension.as_str(), "png" | "jpg" | "jpeg") {
            return Err(Error::InvalidInput(format!(
                "Unsupported image type for {} (expected png, jpg or jpeg)",
                file_name
            )));
        }

        let format = image::guess_format(&bytes)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", file_name, e)))?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(Error::InvalidInput(format!(
                "{} is not a PNG or JPEG image",
                file_name
            )));
        }

        let (width_px, height_px) = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| Error::InvalidInput(format!("{}: {}", file_name, e)))?
            .dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(Error::InvalidInput(format!("{} has no pixels", file_name)));
        }

        Ok(Self {
            file_name,
            bytes,
            width_px,
            height_px,
        })
    }
}

/// One KEDB entry as entered on the form
#[derive(Debug, Clone)]
pub struct KedbRecord {
    pub number: KedbNumber,
    pub short_description: String,
    pub issue_type: IssueType,
    pub created_on: NaiveDate,
    pub creator: String,
    pub version: String,
    pub approver: Option<String>,
    pub detailed_description: String,
    pub root_cause: String,
    pub root_cause_images: Vec<ImageAttachment>,
    pub fix: String,
    pub fix_images: Vec<ImageAttachment>,
}

impl KedbRecord {
    /// Check every free-text field can be written into the document
    pub fn validate(&self) -> Result<()> {
        check_document_text("short description", &self.short_description)?;
        check_document_text("creator", &self.creator)?;
        check_document_text("version", &self.version)?;
        if let Some(approver) = &self.approver {
            check_document_text("approver", approver)?;
        }
        check_document_text("detailed description", &self.detailed_description)?;
        check_document_text("root cause", &self.root_cause)?;
        check_document_text("fix", &self.fix)?;
        Ok(())
    }

    /// Approver as printed in the revision table
    pub fn approver_or_na(&self) -> &str {
        self.approver.as_deref().unwrap_or("N/A")
    }
}

/// Characters XML 1.0 allows in text content
///
/// Tab, line feed and carriage return are the only permitted control
/// characters; U+FFFE and U+FFFF are excluded as well.
pub fn is_document_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Reject text that would make `word/document.xml` malformed
pub fn check_document_text(field: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| !is_document_char(*c)) {
        Some(c) => Err(Error::InvalidInput(format!(
            "The {} contains an unsupported character (U+{:04X})",
            field,
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

/// Normalize an optional form value: blank input becomes `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png_bytes;

    #[test]
    fn test_issue_type_parse() {
        assert_eq!("System".parse::<IssueType>().unwrap(), IssueType::System);
        assert_eq!("data".parse::<IssueType>().unwrap(), IssueType::Data);
        assert_eq!(
            " CONFIGURATION ".parse::<IssueType>().unwrap(),
            IssueType::Configuration
        );
        assert!("Network".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_issue_type_display_round_trip() {
        for t in IssueType::ALL {
            assert_eq!(t.to_string().parse::<IssueType>().unwrap(), t);
        }
    }

    #[test]
    fn test_image_attachment_accepts_png() {
        let attachment = ImageAttachment::new("snap.PNG", png_bytes(8, 4)).unwrap();
        assert_eq!(attachment.width_px, 8);
        assert_eq!(attachment.height_px, 4);
    }

    #[test]
    fn test_image_attachment_rejects_extension() {
        let err = ImageAttachment::new("snap.gif", png_bytes(2, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_image_attachment_rejects_garbage() {
        let err = ImageAttachment::new("snap.png", b"not an image".to_vec()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_document_text_allows_whitespace_controls() {
        assert!(check_document_text("fix", "line one\r\n\tline two").is_ok());
        assert!(check_document_text("fix", "Umlaut \u{00FC} and emoji \u{1F600}").is_ok());
    }

    #[test]
    fn test_document_text_rejects_xml_invalid_characters() {
        for bad in ["page\u{000C}feed", "bell\u{0007}", "\u{0001}", "nul\u{0000}", "\u{FFFE}"] {
            let err = check_document_text("root cause", bad).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_validate_checks_every_text_field() {
        let mut record = crate::test_support::sample_record(1);
        assert!(record.validate().is_ok());

        record.approver = Some("Ann\u{001B}".to_string());
        assert!(matches!(record.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some("Ann".to_string())), Some("Ann".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
