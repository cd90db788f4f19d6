//! Fixtures shared by unit tests

use std::io::Cursor;

use chrono::NaiveDate;

use crate::{ImageAttachment, IssueType, KedbNumber, KedbRecord};

/// Encode a solid-colour PNG
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

pub(crate) fn png_attachment(name: &str) -> ImageAttachment {
    png_attachment_sized(name, 40, 20)
}

/// Distinct sizes give distinct bytes, so nothing is deduplicated
pub(crate) fn png_attachment_sized(name: &str, width: u32, height: u32) -> ImageAttachment {
    ImageAttachment::new(name, png_bytes(width, height)).unwrap()
}

pub(crate) fn sample_record(number: u32) -> KedbRecord {
    KedbRecord {
        number: KedbNumber::new(number).unwrap(),
        short_description: "Nightly export stalls".to_string(),
        issue_type: IssueType::Data,
        created_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        creator: "R. Patel".to_string(),
        version: "1.0".to_string(),
        approver: None,
        detailed_description: "Export job hangs at 90%.\nRetries do not help.".to_string(),
        root_cause: "Lock held by the reporting job.".to_string(),
        root_cause_images: Vec::new(),
        fix: "Reschedule the reporting job.".to_string(),
        fix_images: Vec::new(),
    }
}
