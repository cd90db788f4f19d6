//! KEDB document assembly
//!
//! Lays a [`KedbRecord`] out as a Word document. The section order is fixed:
//!
//! 1. Title `KEDB Entry - KEDB####`
//! 2. Issue Summary (number, short description, issue type)
//! 3. Document Revision History (date / version / creator / approver table)
//! 4. Detailed Description of Problem
//! 5. Root Cause, with embedded snapshots
//! 6. Workaround / Fix, with embedded snapshots
//!
//! Sections 2 to 4 each end with a page break.

use std::io::Cursor;

use docx_rs::{
    BreakType, Docx, Paragraph, Pic, Run, Style, StyleType, Table, TableCell, TableRow, WidthType,
};
use tracing::debug;

use crate::time::format_date;
use crate::{Error, ImageAttachment, KedbRecord, Result};

/// MIME type of generated documents
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// English Metric Units per inch
const EMU_PER_INCH: u64 = 914_400;

/// Embedded snapshots are scaled to this width
const IMAGE_WIDTH_INCHES: u64 = 5;

const TITLE_STYLE: &str = "Title";
const HEADING1_STYLE: &str = "Heading1";

/// Revision table column width in twentieths of a point
const REVISION_COLUMN_WIDTH: usize = 2250;

const REVISION_HEADERS: [&str; 4] = ["Date", "Version", "Creator", "Approver"];

/// Build the document for `record`
///
/// Fails with `InvalidInput` when a text field holds characters that cannot
/// appear in the document XML.
pub fn assemble(record: &KedbRecord) -> Result<Docx> {
    record.validate()?;
    let number = record.number.to_string();

    let mut docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(52)
                .color("17365D"),
        )
        .add_style(
            Style::new(HEADING1_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(28)
                .bold()
                .color("365F91"),
        )
        .add_paragraph(styled(TITLE_STYLE, format!("KEDB Entry - {}", number)));

    // Issue summary
    docx = docx
        .add_paragraph(styled(HEADING1_STYLE, "Issue Summary"))
        .add_paragraph(text(format!("KEDB Number: {}", number)))
        .add_paragraph(text(format!(
            "Short Description: {}",
            record.short_description
        )))
        .add_paragraph(text(format!("Issue Type: {}", record.issue_type)))
        .add_paragraph(page_break());

    // Revision history
    docx = docx
        .add_paragraph(styled(HEADING1_STYLE, "Document Revision History"))
        .add_table(revision_table(record))
        .add_paragraph(page_break());

    docx = docx
        .add_paragraph(styled(HEADING1_STYLE, "1.Detailed Description of Problem"))
        .add_paragraph(text(&record.detailed_description))
        .add_paragraph(page_break());

    docx = docx
        .add_paragraph(styled(HEADING1_STYLE, "2.Root Cause"))
        .add_paragraph(text(&record.root_cause));
    docx = add_images(docx, &record.root_cause_images);

    docx = docx
        .add_paragraph(styled(HEADING1_STYLE, "3.Workaround / Fix"))
        .add_paragraph(text(&record.fix));
    docx = add_images(docx, &record.fix_images);

    debug!(
        "Assembled {} with {} root cause and {} fix image(s)",
        number,
        record.root_cause_images.len(),
        record.fix_images.len()
    );
    Ok(docx)
}

/// Assemble and package `record` as `.docx` bytes
pub fn render(record: &KedbRecord) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    assemble(record)?
        .build()
        .pack(&mut cursor)
        .map_err(|e| Error::Document(format!("Failed to package {}: {}", record.number, e)))?;
    Ok(cursor.into_inner())
}

fn styled(style: &str, value: impl Into<String>) -> Paragraph {
    Paragraph::new()
        .style(style)
        .add_run(Run::new().add_text(value))
}

/// Plain paragraph; embedded newlines become line breaks
fn text(value: impl AsRef<str>) -> Paragraph {
    Paragraph::new().add_run(multiline_run(value.as_ref()))
}

fn multiline_run(value: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in value.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

fn revision_table(record: &KedbRecord) -> Table {
    let header = TableRow::new(
        REVISION_HEADERS
            .iter()
            .map(|h| cell(Run::new().add_text(*h).bold()))
            .collect(),
    );

    let date = format_date(record.created_on);
    let entry = TableRow::new(
        [
            date.as_str(),
            record.version.as_str(),
            record.creator.as_str(),
            record.approver_or_na(),
        ]
        .into_iter()
        .map(|v| cell(Run::new().add_text(v)))
        .collect(),
    );

    Table::new(vec![header, entry]).set_grid(vec![REVISION_COLUMN_WIDTH; REVISION_HEADERS.len()])
}

fn cell(run: Run) -> TableCell {
    TableCell::new()
        .width(REVISION_COLUMN_WIDTH, WidthType::Dxa)
        .add_paragraph(Paragraph::new().add_run(run))
}

/// Each image goes in its own paragraph, followed by an empty one
fn add_images(mut docx: Docx, images: &[ImageAttachment]) -> Docx {
    for image in images {
        let (width, height) = scaled_size(image);
        let pic = Pic::new(&image.bytes).size(width, height);
        docx = docx
            .add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)))
            .add_paragraph(Paragraph::new());
    }
    docx
}

/// Size in EMU at the fixed width, keeping the aspect ratio
fn scaled_size(image: &ImageAttachment) -> (u32, u32) {
    let width = IMAGE_WIDTH_INCHES * EMU_PER_INCH;
    let height = width * u64::from(image.height_px) / u64::from(image.width_px.max(1));
    (width as u32, height.min(u64::from(u32::MAX)) as u32)
}
