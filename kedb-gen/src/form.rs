//! KEDB form submission parsing
//!
//! The browser posts the form as `multipart/form-data`. Text fields map onto
//! [`KedbForm`]; the two file inputs may repeat, one part per uploaded image.

use axum::extract::Multipart;
use chrono::NaiveDate;
use kedb_common::record::{non_blank, DEFAULT_VERSION};
use kedb_common::{ImageAttachment, IssueType, KedbNumber, KedbRecord};
use tracing::debug;

use crate::error::ApiResult;

/// Form field names, shared with `ui/app.js`
pub mod fields {
    pub const SHORT_DESCRIPTION: &str = "short_description";
    pub const ISSUE_TYPE: &str = "issue_type";
    pub const CREATOR: &str = "creator";
    pub const VERSION: &str = "version";
    pub const APPROVER: &str = "approver";
    pub const DETAILED_DESCRIPTION: &str = "detailed_description";
    pub const ROOT_CAUSE: &str = "root_cause";
    pub const ROOT_CAUSE_IMAGES: &str = "root_cause_images";
    pub const FIX: &str = "fix";
    pub const FIX_IMAGES: &str = "fix_images";
}

/// Submitted form values, before a number is assigned
#[derive(Debug, Default)]
pub struct KedbForm {
    pub short_description: String,
    pub issue_type: Option<String>,
    pub creator: String,
    pub version: Option<String>,
    pub approver: Option<String>,
    pub detailed_description: String,
    pub root_cause: String,
    pub root_cause_images: Vec<ImageAttachment>,
    pub fix: String,
    pub fix_images: Vec<ImageAttachment>,
}

impl KedbForm {
    /// Read every part of the submission
    ///
    /// File inputs left empty still send a part with no file name and no
    /// content; those are skipped. Unknown fields are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = KedbForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                fields::ROOT_CAUSE_IMAGES | fields::FIX_IMAGES => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    let attachment = ImageAttachment::new(file_name, bytes.to_vec())?;
                    if name == fields::ROOT_CAUSE_IMAGES {
                        form.root_cause_images.push(attachment);
                    } else {
                        form.fix_images.push(attachment);
                    }
                }
                fields::SHORT_DESCRIPTION => form.short_description = field.text().await?,
                fields::ISSUE_TYPE => form.issue_type = Some(field.text().await?),
                fields::CREATOR => form.creator = field.text().await?,
                fields::VERSION => form.version = Some(field.text().await?),
                fields::APPROVER => form.approver = Some(field.text().await?),
                fields::DETAILED_DESCRIPTION => form.detailed_description = field.text().await?,
                fields::ROOT_CAUSE => form.root_cause = field.text().await?,
                fields::FIX => form.fix = field.text().await?,
                other => debug!("Ignoring unknown form field: {}", other),
            }
        }

        Ok(form)
    }

    /// Combine the form with its assigned number and creation date
    ///
    /// A missing issue type defaults to `System`, the first choice on the
    /// form; a blank version defaults to `1.0`.
    pub fn into_record(self, number: KedbNumber, created_on: NaiveDate) -> ApiResult<KedbRecord> {
        let issue_type = match non_blank(self.issue_type) {
            Some(value) => value.parse::<IssueType>()?,
            None => IssueType::System,
        };
        let version = non_blank(self.version)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let approver = non_blank(self.approver).map(|a| a.trim().to_string());

        let record = KedbRecord {
            number,
            short_description: self.short_description.trim().to_string(),
            issue_type,
            created_on,
            creator: self.creator.trim().to_string(),
            version,
            approver,
            detailed_description: self.detailed_description,
            root_cause: self.root_cause,
            root_cause_images: self.root_cause_images,
            fix: self.fix,
            fix_images: self.fix_images,
        };
        record.validate()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn test_into_record_defaults() {
        let record = KedbForm::default()
            .into_record(KedbNumber::FIRST, date())
            .unwrap();

        assert_eq!(record.issue_type, IssueType::System);
        assert_eq!(record.version, "1.0");
        assert_eq!(record.approver, None);
        assert_eq!(record.approver_or_na(), "N/A");
    }

    #[test]
    fn test_into_record_trims_single_line_fields() {
        let form = KedbForm {
            short_description: "  Disk full  ".to_string(),
            issue_type: Some("configuration".to_string()),
            creator: " Sam ".to_string(),
            version: Some(" 2.1 ".to_string()),
            approver: Some("  ".to_string()),
            ..Default::default()
        };
        let record = form.into_record(KedbNumber::FIRST, date()).unwrap();

        assert_eq!(record.short_description, "Disk full");
        assert_eq!(record.issue_type, IssueType::Configuration);
        assert_eq!(record.creator, "Sam");
        assert_eq!(record.version, "2.1");
        assert_eq!(record.approver, None);
    }

    #[test]
    fn test_into_record_rejects_unknown_issue_type() {
        let form = KedbForm {
            issue_type: Some("Hardware".to_string()),
            ..Default::default()
        };
        let err = form.into_record(KedbNumber::FIRST, date()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_into_record_rejects_control_characters() {
        let form = KedbForm {
            root_cause: "Pasted from a terminal\u{000C}\u{0001}".to_string(),
            ..Default::default()
        };
        let err = form.into_record(KedbNumber::FIRST, date()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_into_record_keeps_tabs_and_newlines() {
        let form = KedbForm {
            fix: "Step 1\tstop\r\nStep 2\tstart".to_string(),
            ..Default::default()
        };
        let record = form.into_record(KedbNumber::FIRST, date()).unwrap();
        assert_eq!(record.fix, "Step 1\tstop\r\nStep 2\tstart");
    }
}
